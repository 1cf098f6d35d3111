//! Struct-table extractor — line-by-line state machine.
//!
//! Recovers one raw entry per `{ ... },` table row from two file kinds that
//! declare message tables with slightly different conventions:
//!
//! - **declaration files** (`LogStructure.h`): tables live inside `#define`
//!   blocks, so every continuation line must end with a backslash and the
//!   table ends implicitly at the first line that is neither a row nor a
//!   marker;
//! - **the vehicle file** (`Log.cpp`): the table is a real array initializer,
//!   continuation lines need no backslash and the table ends at `};`.
//!
//! Lines are first classified into a tagged result, then fed to a small
//! per-variant transition table. No attempt is made to model the
//! preprocessor beyond skipping a fixed set of conditional directives.

use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_TRAILING_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//.*").unwrap());
static RE_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*$").unwrap());

/// Complete row on a single line: `{ <content> },`
static RE_ROW_ONE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{(.*)\},\s*").unwrap());

/// Multi-line row opener, declaration variant — the backslash is the
/// macro-continuation marker and is mandatory.
static RE_OPEN_DECL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\{(.*)\\\s*$").unwrap());

/// Multi-line row opener, vehicle variant — plain array initializer.
static RE_OPEN_VEHICLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\{(.*)").unwrap());

/// Row close, declaration variant: `<content> }` followed by any mix of
/// comma, whitespace and continuation backslash.
static RE_CLOSE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\}[,\s\\]*$").unwrap());

/// Row close, vehicle variant: `<content> }` with optional comma.
static RE_CLOSE_VEHICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\},?\s*$").unwrap());

/// Table start in declaration files.
static RE_TABLE_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#define LOG_STRUCTURE_FROM_.*").unwrap());
static RE_TABLE_RTC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#define LOG_RTC_MESSAGE.*").unwrap());

/// Table end in the vehicle file.
static RE_TABLE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\};").unwrap());

/// Source-language string concatenation: two abutting literals collapse
/// into one when a row is reassembled across lines.
static RE_STRING_CONCAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""\s*""#).unwrap());

/// Markers passed through inside a declaration-file table without opening
/// a row (sub-table inclusion and fixed-message macros).
const DECL_PASSTHROUGH: &[&str] = &["LOG_STRUCTURE_FROM_", "LOG_RTC_MESSAGE"];

/// Conditional-compilation noise skipped inside the vehicle table.
const VEHICLE_SKIP: &[&str] = &[
    "#if HAL_QUADPLANE_ENABLED",
    "#if FRAME_CONFIG == HELI_FRAME",
    "#if AC_PRECLAND_ENABLED",
    "#if AP_PLANE_OFFBOARD_GUIDED_SLEW_ENABLED",
    "#end",
    "LOG_COMMON_STRUCTURES",
];

/// What a line means to the state machine, independent of current state.
#[derive(Debug)]
enum LineClass {
    /// Marker to pass through without opening a row.
    Skip,
    /// Explicit end of table (vehicle variant only).
    TableEnd,
    /// `{ ... },` — a whole row on one line.
    RowComplete(String),
    /// `{ ...` — a row that continues on following lines.
    RowOpen(String),
    /// Anything else.
    Other,
}

fn classify_decl(line: &str) -> LineClass {
    if DECL_PASSTHROUGH.iter().any(|m| line.contains(m)) {
        return LineClass::Skip;
    }
    if let Some(caps) = RE_ROW_ONE_LINE.captures(line) {
        return LineClass::RowComplete(caps[1].to_string());
    }
    if let Some(caps) = RE_OPEN_DECL.captures(line) {
        return LineClass::RowOpen(caps[1].to_string());
    }
    LineClass::Other
}

fn classify_vehicle(line: &str) -> LineClass {
    if RE_TABLE_END.is_match(line) {
        return LineClass::TableEnd;
    }
    if VEHICLE_SKIP.iter().any(|m| line.contains(m)) {
        return LineClass::Skip;
    }
    if let Some(caps) = RE_ROW_ONE_LINE.captures(line) {
        return LineClass::RowComplete(caps[1].to_string());
    }
    if let Some(caps) = RE_OPEN_VEHICLE.captures(line) {
        return LineClass::RowOpen(caps[1].to_string());
    }
    LineClass::Other
}

fn is_decl_table_start(line: &str) -> bool {
    line.contains("#define LOG_COMMON_STRUCTURES")
        || RE_TABLE_FROM.is_match(line)
        || RE_TABLE_RTC.is_match(line)
}

fn is_vehicle_table_start(line: &str) -> bool {
    line.contains("const LogStructure") || line.contains("const struct LogStructure")
}

/// Scan a declaration file for message-table rows.
///
/// The table has no explicit terminator: the first line inside the table
/// that is neither a row nor a marker drops the scan back outside.
pub fn scan_declaration_file(content: &str) -> Result<Vec<String>> {
    let mut inside = false;
    let mut partial: Option<String> = None;
    let mut entries = Vec::new();

    for raw in content.lines() {
        let line = RE_TRAILING_COMMENT.replace(raw, "");
        if RE_BLANK.is_match(&line) {
            continue;
        }

        if !inside {
            if is_decl_table_start(&line) {
                inside = true;
            }
            continue;
        }

        if let Some(mut buf) = partial.take() {
            if let Some(caps) = RE_CLOSE_DECL.captures(&line) {
                buf.push_str(&caps[1]);
                entries.push(buf);
                continue;
            }
            let trimmed = line.trim_end();
            let Some(stripped) = trimmed.strip_suffix('\\') else {
                bail!("expected backslash at end of line: ({trimmed})");
            };
            let joined = RE_STRING_CONCAT.replace_all(stripped.trim_end(), "");
            buf.push_str(&joined);
            partial = Some(buf);
            continue;
        }

        match classify_decl(&line) {
            LineClass::Skip => {}
            LineClass::RowComplete(text) => entries.push(text),
            LineClass::RowOpen(text) => partial = Some(text),
            LineClass::Other | LineClass::TableEnd => inside = false,
        }
    }

    if partial.is_some() {
        bail!("unterminated table row at end of declaration file");
    }
    Ok(entries)
}

/// Scan the vehicle aggregation file for message-table rows.
///
/// The table is bounded by `const [struct] LogStructure` and `};`; reaching
/// the end of the file while still inside it is fatal, as is any line inside
/// the table that cannot open a row.
pub fn scan_vehicle_file(content: &str) -> Result<Vec<String>> {
    let mut inside = false;
    let mut partial: Option<String> = None;
    let mut entries = Vec::new();

    for raw in content.lines() {
        let line = RE_TRAILING_COMMENT.replace(raw, "");
        if RE_BLANK.is_match(&line) {
            continue;
        }

        if !inside {
            if is_vehicle_table_start(&line) {
                inside = true;
            }
            continue;
        }

        if let Some(mut buf) = partial.take() {
            if let Some(caps) = RE_CLOSE_VEHICLE.captures(&line) {
                buf.push_str(&caps[1]);
                entries.push(buf);
                continue;
            }
            let mut cont = line.trim_end();
            cont = cont.strip_suffix('\\').unwrap_or(cont).trim_end();
            let joined = RE_STRING_CONCAT.replace_all(cont, "");
            buf.push_str(&joined);
            partial = Some(buf);
            continue;
        }

        match classify_vehicle(&line) {
            LineClass::TableEnd => {
                inside = false;
                break;
            }
            LineClass::Skip => {}
            LineClass::RowComplete(text) => entries.push(text),
            LineClass::RowOpen(text) => partial = Some(text),
            LineClass::Other => bail!("bad line in vehicle message table: ({line})"),
        }
    }

    if inside {
        bail!("vehicle message table not terminated before end of file");
    }
    Ok(entries)
}
