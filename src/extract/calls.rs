//! Call-site extractor.
//!
//! Logging calls declare messages implicitly: the first two arguments of a
//! `Write()` invocation are the message name and its comma-joined labels.
//! Statements routinely span several lines and split their literals with
//! source-language string concatenation, so each invocation is reassembled
//! into one logical statement before the normalizer sees it.

use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_TRAILING_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//.*").unwrap());
static RE_STRING_CONCAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""\s*""#).unwrap());
/// Reassembly-time variant of the collapse: whitespace is required so a
/// bare `""` argument is left alone.
static RE_STRING_JOIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""\s+""#).unwrap());
static RE_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Call through the namespaced logging accessor, optionally streaming.
static RE_OPEN_ACCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*AP::logger\(\)\.Write(?:Streaming)?\(").unwrap());

/// Call through a locally-bound logger variable, optionally streaming.
static RE_OPEN_LOCAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*logger\.Write(?:Streaming)?\(").unwrap());

fn is_call_open(line: &str) -> bool {
    RE_OPEN_ACCESSOR.is_match(line) || RE_OPEN_LOCAL.is_match(line)
}

fn is_statement_end(line: &str) -> bool {
    line.contains(");")
}

/// Scan one implementation file for logging-call statements.
///
/// Each returned statement is a single line with whitespace runs collapsed
/// and adjacent string literals joined. Reaching end of file inside an
/// unterminated statement is fatal.
pub fn scan_implementation_file(content: &str) -> Result<Vec<String>> {
    let mut statements = Vec::new();
    let mut buffer: Option<String> = None;

    for raw in content.lines() {
        match buffer.take() {
            None => {
                if !is_call_open(raw) {
                    continue;
                }
                let line = RE_TRAILING_COMMENT.replace(raw, "").to_string();
                if is_statement_end(&line) {
                    statements.push(line);
                } else {
                    buffer = Some(line);
                }
            }
            Some(mut buf) => {
                let line = RE_TRAILING_COMMENT.replace(raw, "");
                let line = RE_STRING_CONCAT.replace_all(&line, "");
                buf.push('\n');
                buf.push_str(&line);
                if is_statement_end(&line) {
                    statements.push(buf);
                } else {
                    buffer = Some(buf);
                }
            }
        }
    }

    if buffer.is_some() {
        bail!("logging call not terminated before end of file");
    }

    // Collapse whitespace runs, then join literals split across lines —
    // per-line collapsing cannot see an abutting pair that straddles a
    // line break.
    Ok(statements
        .iter()
        .map(|s| {
            let flat = RE_WHITESPACE_RUN.replace_all(s, " ");
            RE_STRING_JOIN.replace_all(&flat, "").to_string()
        })
        .collect())
}
