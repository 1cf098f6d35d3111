//! Macro table builder.
//!
//! Declaration files use `#define` placeholders for label/format/unit/
//! multiplier strings shared between table rows. These are plain textual
//! defines on dedicated lines; the stored value keeps its surrounding
//! quotes so substitution splices a quoted literal into the row text.

use anyhow::{bail, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static RE_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^#define (\w+_(?:LABELS|FMT|UNITS|MULTS))\s+(".*")"#).unwrap());

/// Scan lines for format/label/unit/multiplier defines.
/// Duplicate definition of a name is fatal.
pub fn find_format_defines<'a, I>(lines: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ret = BTreeMap::new();
    for line in lines {
        let Some(caps) = RE_DEFINE.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        let value = caps[2].to_string();
        if ret.contains_key(&name) {
            bail!("duplicate define for ({name})");
        }
        ret.insert(name, value);
    }
    Ok(ret)
}
