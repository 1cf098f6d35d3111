//! Data model for extracted and documented log messages.

use std::collections::BTreeMap;

/// Where a raw entry was recovered from. Struct-table rows carry the full
/// five-field metadata; call sites only name the message and its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    StructTable,
    CallSite,
}

/// One fully-reassembled declaration occurrence, not yet parsed into a
/// record: either the inside of a `{ ... }` table row or a complete
/// `logger.Write(...)` statement.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub text: String,
    pub origin: Origin,
}

impl RawEntry {
    pub fn struct_table(text: String) -> Self {
        RawEntry {
            text,
            origin: Origin::StructTable,
        }
    }

    pub fn call_site(text: String) -> Self {
        RawEntry {
            text,
            origin: Origin::CallSite,
        }
    }
}

/// A log message definition recovered from source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub name: String,
    /// Format string — struct-table rows only.
    pub format: Option<String>,
    /// Field labels in declaration order.
    pub labels: Vec<String>,
    pub units: Option<String>,
    pub multipliers: Option<String>,
}

/// A log message as described by the documentation tree. An empty label
/// list is meaningful: it means the message is documented without fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRecord {
    pub name: String,
    pub labels: Vec<String>,
}

/// Name-keyed record sets; BTreeMap so iteration is already in the sorted
/// order the validator requires.
pub type CodeIds = BTreeMap<String, MessageRecord>;
pub type DocIds = BTreeMap<String, DocRecord>;

/// Aggregated findings from the cross-reference pass. Fatal conditions
/// (duplicate labels, label containment mismatches) never reach a verdict;
/// they abort the run as errors.
#[derive(Debug, Default)]
pub struct Verdict {
    /// Non-whitelisted code messages with no documentation at all.
    pub undocumented: Vec<String>,
    /// Whitelisted messages that nonetheless have (matching) documentation.
    pub overdocumented: Vec<String>,
    /// Non-whitelisted documented messages absent from code.
    pub missing: Vec<String>,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        self.undocumented.is_empty() && self.overdocumented.is_empty() && self.missing.is_empty()
    }
}
