//! Answer skeletons
//!
//! Every leaf gets an empty value shaped for its input type, so a form can
//! bind to the map without null checks. Sections contribute nothing.

use crate::value::{AnswerMap, AnswerValue};
use inspecta_schema::{leaves, Node, NodeKind};

/// Empty value for one leaf; `None` for sections
#[must_use]
pub fn default_answer(node: &Node) -> Option<AnswerValue> {
    match &node.kind {
        NodeKind::Section { .. } => None,
        NodeKind::Select {
            allow_multiple: true,
            ..
        } => Some(AnswerValue::Choices(Vec::new())),
        NodeKind::Checkbox => Some(AnswerValue::Flag(false)),
        NodeKind::Select { .. } | NodeKind::Text | NodeKind::Number | NodeKind::Textarea => {
            Some(AnswerValue::Text(String::new()))
        }
    }
}

/// Initial answers for a tree: one entry per leaf, in traversal order
///
/// Multi-selects start as `[]`, checkboxes as `false`, everything else as
/// `""`.
#[must_use]
pub fn build_initial_answers(nodes: &[Node]) -> AnswerMap {
    leaves(nodes)
        .filter_map(|node| default_answer(node).map(|value| (node.key.as_str().to_string(), value)))
        .collect()
}

/// Carry a saved draft over to a (possibly newer) tree
///
/// Starts from the skeleton of `nodes` and keeps each draft answer whose key
/// still names a leaf and whose value still fits that leaf's input type.
/// Answers for removed leaves are dropped.
#[must_use]
pub fn reconcile_answers(nodes: &[Node], draft: &AnswerMap) -> AnswerMap {
    let mut answers = build_initial_answers(nodes);
    let mut dropped = 0usize;

    for (key, value) in draft.iter() {
        match answers.get(key).map(|default| default.same_shape(value)) {
            Some(true) => {
                answers.insert(key, value.clone());
            }
            Some(false) => {
                tracing::debug!(key, "draft answer no longer fits its input type");
                dropped += 1;
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = draft.len() - dropped, "reconciled draft answers");
    }
    answers
}
