//! Documentation record loader.
//!
//! Reads the XML tree produced by the external documentation generator:
//! one `logformat` element per documented message, each carrying a `name`
//! attribute and a nested `fields` list of `field` elements. Consumed
//! read-only; nothing beyond the names the cross-reference needs is
//! interpreted.

use crate::model::{DocIds, DocRecord};
use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;

/// Parse the documentation tree into name-keyed records.
///
/// A documented message with no field list at all is fatal unless the
/// message is whitelisted, in which case it is kept with empty labels
/// (the validator flags it as overdocumented if it matches code).
pub fn load_doc_ids(xml: &str, whitelist: &BTreeSet<String>) -> Result<DocIds> {
    let tree = roxmltree::Document::parse(xml).context("failed to parse documentation tree")?;

    let mut ids = DocIds::new();
    for element in tree
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("logformat"))
    {
        let Some(name) = element.attribute("name") else {
            bail!("logformat element without a name attribute");
        };

        let labels: Vec<String> = element
            .children()
            .filter(|n| n.has_tag_name("fields"))
            .flat_map(|fields| fields.children())
            .filter(|n| n.has_tag_name("field"))
            .filter_map(|f| f.attribute("name"))
            .map(|s| s.to_string())
            .collect();

        if labels.is_empty() && !whitelist.contains(name) {
            bail!("no documented fields for {name}");
        }

        ids.insert(
            name.to_string(),
            DocRecord {
                name: name.to_string(),
                labels,
            },
        );
    }
    Ok(ids)
}
