//! Cross-reference validator.
//!
//! Diffs the code-derived record set against the documentation-derived one
//! under the vehicle's whitelist. Whole-message findings (undocumented,
//! overdocumented, missing-in-code) are aggregated into the verdict and
//! reported together; label-level containment mismatches and duplicate
//! labels are fatal and abort the run with partial findings. Whitelisted
//! messages have label mismatches downgraded to warnings, which also
//! removes them from the overdocumented set.

use crate::model::{CodeIds, DocIds, Verdict};
use anyhow::{bail, Result};
use std::collections::{BTreeSet, HashSet};

/// Evaluate every code-side and documentation-side name in sorted order.
pub fn cross_reference(
    code_ids: &CodeIds,
    doc_ids: &DocIds,
    whitelist: &BTreeSet<String>,
) -> Result<Verdict> {
    let mut undocumented = Vec::new();
    let mut overdocumented = BTreeSet::new();

    for (name, record) in code_ids {
        let Some(doc) = doc_ids.get(name) else {
            if !whitelist.contains(name) {
                undocumented.push(name.clone());
            }
            continue;
        };

        // Whitelisting means documentation is not expected at all.
        if whitelist.contains(name) {
            overdocumented.insert(name.clone());
        }

        let mut seen = HashSet::new();
        for label in &record.labels {
            if !seen.insert(label.as_str()) {
                bail!("{name}.{label} is a duplicate label");
            }

            if doc.labels.iter().any(|l| l == label) {
                continue;
            }
            let have = doc.labels.join(",");
            let message = format!("{name}.{label} not in documented fields (have ({have}))");
            if whitelist.contains(name) {
                eprintln!("warning: {message}");
                overdocumented.remove(name);
                continue;
            }
            bail!(message);
        }
    }

    let mut missing = Vec::new();
    for (name, doc) in doc_ids {
        let Some(record) = code_ids.get(name) else {
            if !whitelist.contains(name) {
                missing.push(name.clone());
            }
            continue;
        };

        for label in &doc.labels {
            if !record.labels.iter().any(|l| l == label) {
                bail!("documented field {name}.{label} not found in code");
            }
        }
    }

    Ok(Verdict {
        undocumented,
        overdocumented: overdocumented.into_iter().collect(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocRecord, MessageRecord};

    fn code(entries: &[(&str, &[&str])]) -> CodeIds {
        entries
            .iter()
            .map(|(name, labels)| {
                (
                    name.to_string(),
                    MessageRecord {
                        name: name.to_string(),
                        format: None,
                        labels: labels.iter().map(|s| s.to_string()).collect(),
                        units: None,
                        multipliers: None,
                    },
                )
            })
            .collect()
    }

    fn docs(entries: &[(&str, &[&str])]) -> DocIds {
        entries
            .iter()
            .map(|(name, labels)| {
                (
                    name.to_string(),
                    DocRecord {
                        name: name.to_string(),
                        labels: labels.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect()
    }

    fn wl(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matching_records_pass() {
        let code = code(&[("ATT", &["TimeUS", "DesRoll", "Roll"])]);
        let docs = docs(&[("ATT", &["TimeUS", "DesRoll", "Roll"])]);
        let verdict = cross_reference(&code, &docs, &wl(&[])).unwrap();
        assert!(verdict.passed());
        assert!(verdict.undocumented.is_empty());
        assert!(verdict.overdocumented.is_empty());
        assert!(verdict.missing.is_empty());
    }

    #[test]
    fn undocumented_message_aggregated() {
        let code = code(&[("ATT", &["TimeUS"]), ("GPS", &["TimeUS"])]);
        let docs = docs(&[("ATT", &["TimeUS"])]);
        let verdict = cross_reference(&code, &docs, &wl(&[])).unwrap();
        assert_eq!(verdict.undocumented, vec!["GPS"]);
        assert!(!verdict.passed());
    }

    #[test]
    fn whitelisted_message_may_be_undocumented() {
        let code = code(&[("TECS", &["TimeUS"])]);
        let docs = docs(&[]);
        let verdict = cross_reference(&code, &docs, &wl(&["TECS"])).unwrap();
        assert!(verdict.undocumented.is_empty());
        assert!(verdict.passed());
    }

    #[test]
    fn whitelisted_message_with_matching_docs_is_overdocumented() {
        let code = code(&[("TECS", &["TimeUS"])]);
        let docs = docs(&[("TECS", &["TimeUS"])]);
        let verdict = cross_reference(&code, &docs, &wl(&["TECS"])).unwrap();
        assert_eq!(verdict.overdocumented, vec!["TECS"]);
        assert!(!verdict.passed());
    }

    #[test]
    fn whitelisted_label_mismatch_downgraded_to_warning() {
        let code = code(&[("TECS", &["TimeUS", "Spd"])]);
        let docs = docs(&[("TECS", &["TimeUS"])]);
        let verdict = cross_reference(&code, &docs, &wl(&["TECS"])).unwrap();
        // The mismatch demotes the overdocumented finding; the run passes.
        assert!(verdict.overdocumented.is_empty());
        assert!(verdict.passed());
    }

    #[test]
    fn label_mismatch_fatal_names_message_and_label() {
        let code = code(&[("ATT", &["TimeUS", "Roll"])]);
        let docs = docs(&[("ATT", &["TimeUS"])]);
        let err = cross_reference(&code, &docs, &wl(&[])).unwrap_err();
        assert!(err.to_string().contains("ATT.Roll"));
    }

    #[test]
    fn duplicate_label_fatal() {
        let code = code(&[("ATT", &["TimeUS", "Roll", "Roll"])]);
        let docs = docs(&[("ATT", &["TimeUS", "Roll"])]);
        let err = cross_reference(&code, &docs, &wl(&[])).unwrap_err();
        assert!(err.to_string().contains("duplicate label"));
    }

    #[test]
    fn documented_but_not_in_code_aggregated() {
        let code = code(&[("ATT", &["TimeUS"])]);
        let docs = docs(&[("ATT", &["TimeUS"]), ("OLD1", &["TimeUS"]), ("OLD2", &["TimeUS"])]);
        let verdict = cross_reference(&code, &docs, &wl(&[])).unwrap();
        assert_eq!(verdict.missing, vec!["OLD1", "OLD2"]);
    }

    #[test]
    fn whitelisted_doc_only_message_skips_label_check() {
        let code = code(&[("ATT", &["TimeUS"])]);
        let docs = docs(&[("ATT", &["TimeUS"]), ("SOAR", &["TimeUS", "X"])]);
        let verdict = cross_reference(&code, &docs, &wl(&["SOAR"])).unwrap();
        assert!(verdict.missing.is_empty());
        assert!(verdict.passed());
    }

    #[test]
    fn documented_label_absent_from_code_fatal() {
        let code = code(&[("ATT", &["TimeUS"])]);
        let docs = docs(&[("ATT", &["TimeUS", "Ghost"])]);
        let err = cross_reference(&code, &docs, &wl(&[])).unwrap_err();
        assert!(err.to_string().contains("ATT.Ghost"));
    }

    #[test]
    fn all_categories_aggregated_together() {
        let code = code(&[("NEW", &["TimeUS"]), ("TECS", &["TimeUS"])]);
        let docs = docs(&[("OLD", &["TimeUS"]), ("TECS", &["TimeUS"])]);
        let verdict = cross_reference(&code, &docs, &wl(&["TECS"])).unwrap();
        assert_eq!(verdict.undocumented, vec!["NEW"]);
        assert_eq!(verdict.overdocumented, vec!["TECS"]);
        assert_eq!(verdict.missing, vec!["OLD"]);
    }
}
