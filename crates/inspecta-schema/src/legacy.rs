//! Legacy flat-item adapter
//!
//! Checklists written before structures were versioned stored a flat list of
//! `{key, label, type, options, required}` items. [`migrate_legacy_items`]
//! maps such a list into a root-level [`Node`] forest.
//!
//! The adapter is infallible: it reads already-persisted data, so anything it
//! cannot make sense of is repaired rather than rejected.
//! - missing key: slug of the label, else `item_<n>` (1-based position)
//! - repeated key: numeric suffix
//! - missing label: the key
//! - `type` other than text/number/checkbox/textarea: select
//! - select without options: the canonical three-way set

use crate::key::{disambiguate, slugify};
use crate::node::{InputType, Node, NodeKey, NodeKind};
use crate::normalize::normalize_options;
use crate::raw::RawOption;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One item of a legacy flat checklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<RawOption>>,
    #[serde(default)]
    pub required: bool,
}

/// Convert legacy items into a normalized, flat node forest
#[must_use]
pub fn migrate_legacy_items(items: &[LegacyItem]) -> Vec<Node> {
    let mut keys: HashSet<String> = HashSet::with_capacity(items.len());
    let nodes: Vec<Node> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let key = legacy_key(item, index, &mut keys);
            let title = item
                .label
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(&key)
                .to_string();
            Node {
                key: NodeKey::new(key),
                title,
                description: String::new(),
                required: item.required,
                kind: legacy_kind(item),
            }
        })
        .collect();

    tracing::debug!(items = nodes.len(), "migrated legacy checklist items");
    nodes
}

fn legacy_key(item: &LegacyItem, index: usize, keys: &mut HashSet<String>) -> String {
    let base = [item.key.as_deref(), item.label.as_deref()]
        .into_iter()
        .flatten()
        .map(slugify)
        .find(|k| !k.is_empty())
        .unwrap_or_else(|| format!("item_{}", index + 1));
    let key = disambiguate(&base, |candidate| keys.contains(candidate));
    keys.insert(key.clone());
    key
}

fn legacy_kind(item: &LegacyItem) -> NodeKind {
    let input_type = item
        .item_type
        .as_deref()
        .and_then(|t| t.parse::<InputType>().ok());
    match input_type {
        Some(InputType::Text) => NodeKind::Text,
        Some(InputType::Number) => NodeKind::Number,
        Some(InputType::Checkbox) => NodeKind::Checkbox,
        Some(InputType::Textarea) => NodeKind::Textarea,
        _ => NodeKind::Select {
            options: normalize_options(item.options.as_deref().unwrap_or_default()),
            allow_multiple: false,
        },
    }
}
