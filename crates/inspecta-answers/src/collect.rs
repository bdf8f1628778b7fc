//! Response collection
//!
//! Flattens an answer map into the ordered list submitted with an
//! evaluation. Order is the tree's pre-order, the same order validation
//! reports missing fields in.

use crate::value::{AnswerMap, AnswerValue};
use indexmap::IndexMap;
use inspecta_schema::{leaves, Node};
use serde::{Deserialize, Serialize};

/// Free-text remarks keyed by node key
pub type ItemNotes = IndexMap<String, String>;

/// One submitted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    pub item_key: String,
    /// `null` when the leaf was never answered
    pub value: Option<AnswerValue>,
    #[serde(default)]
    pub note: String,
}

impl ResponseEntry {
    #[inline]
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }
}

/// One entry per leaf, in traversal order
#[must_use]
pub fn collect_responses(nodes: &[Node], answers: &AnswerMap) -> Vec<ResponseEntry> {
    collect_responses_with_notes(nodes, answers, &ItemNotes::new())
}

/// [`collect_responses`] with per-item notes attached
///
/// Notes for keys that are not leaves of `nodes` are ignored.
#[must_use]
pub fn collect_responses_with_notes(
    nodes: &[Node],
    answers: &AnswerMap,
    notes: &ItemNotes,
) -> Vec<ResponseEntry> {
    leaves(nodes)
        .map(|node| {
            let key = node.key.as_str();
            ResponseEntry {
                item_key: key.to_string(),
                value: answers.get(key).cloned(),
                note: notes.get(key).map(|n| n.trim().to_string()).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspecta_schema::RawNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn nested() -> Vec<Node> {
        inspecta_schema::normalize(&[
            RawNode::titled("Motor").with_children(vec![
                RawNode::titled("Aceite").with_children(vec![
                    RawNode::titled("Nivel").with_key("nivel"),
                    RawNode::titled("Color").with_key("color"),
                ]),
                RawNode::titled("Ruido").with_key("ruido"),
            ]),
            RawNode::titled("Km").with_key("km").with_input_type("number"),
        ])
        .unwrap()
    }

    #[test]
    fn one_entry_per_leaf_in_order() {
        let answers = AnswerMap::new().with("km", "1200").with("nivel", "ok");
        let responses = collect_responses(&nested(), &answers);

        let keys: Vec<_> = responses.iter().map(|r| r.item_key.as_str()).collect();
        assert_eq!(keys, ["nivel", "color", "ruido", "km"]);
        assert_eq!(responses[0].value, Some(AnswerValue::from("ok")));
        assert_eq!(responses[1].value, None);
        assert!(!responses[1].is_answered());
    }

    #[test]
    fn unanswered_serializes_as_null() {
        let responses = collect_responses(&nested(), &AnswerMap::new());
        let json = serde_json::to_value(&responses[0]).unwrap();
        assert_eq!(json, json!({"itemKey": "nivel", "value": null, "note": ""}));
    }

    #[test]
    fn notes_are_attached_by_key() {
        let mut notes = ItemNotes::new();
        notes.insert("ruido".into(), "  golpeteo al arrancar ".into());
        notes.insert("motor".into(), "ignored".into());

        let responses = collect_responses_with_notes(&nested(), &AnswerMap::new(), &notes);
        assert_eq!(responses[2].note, "golpeteo al arrancar");
        assert!(responses.iter().all(|r| r.item_key != "motor"));
        assert_eq!(
            serde_json::to_value(&responses[2]).unwrap()["note"],
            json!("golpeteo al arrancar")
        );
    }

    #[test]
    fn extra_answers_are_ignored() {
        let answers = AnswerMap::new().with("stale", "x");
        let responses = collect_responses(&nested(), &answers);
        assert_eq!(responses.len(), 4);
        assert!(responses.iter().all(|r| r.value.is_none()));
    }
}
