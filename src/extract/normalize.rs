//! Record normalizer — raw entry text to typed message records.
//!
//! Macro substitution is naive whole-text replacement: each define name is
//! replaced wherever it appears as text, longest name first, in a single
//! pass. Longest-first makes the outcome deterministic when one define name
//! is a prefix of another; values are never re-scanned for further names.

use crate::model::{CodeIds, MessageRecord, Origin, RawEntry};
use anyhow::{bail, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Struct-table row shape after substitution: message id, size expression,
/// then the five quoted metadata strings and an optional boolean flag.
static RE_STRUCT_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^\s* LOG_\w+ \s*,\s*
        (?:sizeof|RLOG_SIZE)\([^)]+\) \s*,\s*
        "(\w+)" \s*,\s*            # name
        "(\w+)" \s*,\s*            # format
        "([\w,]+)" \s*,\s*         # labels
        "([^"]*)" \s*,\s*          # units
        "([^"]*)" \s*              # multipliers
        (?: ,\s* (?:true|false) )? \s*$
        "#,
    )
    .unwrap()
});

/// Call-statement shapes, tried in order; first match wins.
static RE_CALL_LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*logger\.Write(?:Streaming)?\(\s*"(\w+)"\s*,\s*"([\w,]+)".*\);"#).unwrap()
});
static RE_CALL_ACCESSOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*AP::logger\(\)\.Write(?:Streaming)?\(\s*"(\w+)"\s*,\s*"([\w,]+)".*\);"#)
        .unwrap()
});

/// Abutting literals separated by whitespace join into one. Whitespace is
/// required: a bare `""` is a legitimate empty units/multipliers field, not
/// a concatenation boundary.
static RE_STRING_JOIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""\s+""#).unwrap());

/// Replace every define name appearing in `text` with its value, then join
/// whitespace-separated string literals the substitution (or multi-line
/// reassembly) left behind, e.g. `"TimeUS," GPA_LABELS` becoming one literal.
fn substitute_defines(text: &str, defines: &BTreeMap<String, String>) -> String {
    let mut names: Vec<&String> = defines.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut out = text.to_string();
    for name in names {
        if out.contains(name.as_str()) {
            out = out.replace(name.as_str(), &defines[name]);
        }
    }
    RE_STRING_JOIN.replace_all(&out, "").to_string()
}

fn split_labels(labels: &str) -> Vec<String> {
    labels.split(',').map(|s| s.to_string()).collect()
}

/// Result of normalizing one extraction pass: the merged record set plus a
/// count of struct-table rows that matched a row shape but not the record
/// grammar (dropped by policy, surfaced so operators can audit coverage).
#[derive(Debug)]
pub struct Normalized {
    pub ids: CodeIds,
    pub skipped_rows: usize,
}

/// Build the code-side record set from raw entries.
///
/// Struct-table rows not matching the record grammar are dropped (they are
/// typically conditionally-compiled or fixed-format macro rows) but counted.
/// A call statement matching neither call shape is fatal, as is any name
/// collision or an empty result set.
pub fn build_code_ids(
    entries: &[RawEntry],
    defines: &BTreeMap<String, String>,
) -> Result<Normalized> {
    let mut ids = CodeIds::new();
    let mut skipped_rows = 0;

    for entry in entries.iter().filter(|e| e.origin == Origin::StructTable) {
        let text = substitute_defines(&entry.text, defines);
        let Some(caps) = RE_STRUCT_ROW.captures(&text) else {
            skipped_rows += 1;
            continue;
        };
        let name = caps[1].to_string();
        if ids.contains_key(&name) {
            bail!("already seen a ({name}) message");
        }
        ids.insert(
            name.clone(),
            MessageRecord {
                name,
                format: Some(caps[2].to_string()),
                labels: split_labels(&caps[3]),
                units: Some(caps[4].to_string()),
                multipliers: Some(caps[5].to_string()),
            },
        );
    }

    for entry in entries.iter().filter(|e| e.origin == Origin::CallSite) {
        let text = substitute_defines(&entry.text, defines);
        let caps = match RE_CALL_LOCAL.captures(&text) {
            Some(caps) => caps,
            None => match RE_CALL_ACCESSOR.captures(&text) {
                Some(caps) => caps,
                None => bail!("logging statement matched neither call shape: ({text})"),
            },
        };
        let name = caps[1].to_string();
        if ids.contains_key(&name) {
            bail!("already have an entry for ({name})");
        }
        ids.insert(
            name.clone(),
            MessageRecord {
                name,
                format: None,
                labels: split_labels(&caps[2]),
                units: None,
                multipliers: None,
            },
        );
    }

    if ids.is_empty() {
        bail!("no log message definitions were extracted");
    }

    Ok(Normalized { ids, skipped_rows })
}
