//! Required-field validation

use crate::error::{preview, AnswerError, MISSING_PREVIEW};
use crate::value::AnswerMap;
use inspecta_schema::{leaves, Node};
use serde::{Deserialize, Serialize};

/// Outcome of checking answers against a tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Titles (keys for untitled leaves) of required leaves without a usable
    /// answer, in traversal order
    pub missing: Vec<String>,
}

impl ValidationReport {
    /// Keys listed for display, elided after `limit`
    #[must_use]
    pub fn summary(&self, limit: usize) -> String {
        preview(&self.missing, limit)
    }

    /// [`ValidationReport::into_result_with_preview`] listing
    /// [`MISSING_PREVIEW`] titles
    ///
    /// # Errors
    /// [`AnswerError::MissingRequiredFields`] unless valid
    pub fn into_result(self) -> Result<(), AnswerError> {
        self.into_result_with_preview(MISSING_PREVIEW)
    }

    /// # Errors
    /// [`AnswerError::MissingRequiredFields`] unless valid; its message lists
    /// at most `limit` titles
    pub fn into_result_with_preview(self, limit: usize) -> Result<(), AnswerError> {
        if self.valid {
            Ok(())
        } else {
            Err(AnswerError::MissingRequiredFields {
                missing: self.missing,
                limit,
            })
        }
    }
}

/// Check every required leaf has an answer
///
/// Absent keys, blank text and empty multi-selects are missing. `false` and
/// numeric answers always count. Answers for unknown keys are ignored.
/// Missing leaves are reported by title so the list can be shown as is.
#[must_use]
pub fn validate_answers(nodes: &[Node], answers: &AnswerMap) -> ValidationReport {
    let missing: Vec<String> = leaves(nodes)
        .filter(|node| node.required)
        .filter(|node| answers.get(node.key.as_str()).map_or(true, |v| v.is_empty()))
        .map(|node| node.display_name().to_string())
        .collect();

    if !missing.is_empty() {
        tracing::debug!(missing = missing.len(), "answers incomplete");
    }
    ValidationReport {
        valid: missing.is_empty(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AnswerValue;
    use inspecta_schema::RawNode;
    use pretty_assertions::assert_eq;

    fn required(title: &str, input_type: &str) -> RawNode {
        RawNode::titled(title).with_input_type(input_type).required()
    }

    #[test]
    fn blank_and_absent_text_are_missing() {
        let nodes = inspecta_schema::normalize(&[required("Observaciones", "text")]).unwrap();

        for answers in [AnswerMap::new(), AnswerMap::new().with("observaciones", "   ")] {
            let report = validate_answers(&nodes, &answers);
            assert!(!report.valid);
            assert_eq!(report.missing, ["Observaciones"]);
        }
        assert!(validate_answers(&nodes, &AnswerMap::new().with("observaciones", "ok")).valid);
    }

    #[test]
    fn checkbox_false_counts_as_answered() {
        let nodes = inspecta_schema::normalize(&[required("Luces", "checkbox")]).unwrap();
        assert!(validate_answers(&nodes, &AnswerMap::new().with("luces", false)).valid);
    }

    #[test]
    fn empty_multi_select_is_missing() {
        let nodes =
            inspecta_schema::normalize(&[required("Fallas", "select").multiple()]).unwrap();
        let answers = AnswerMap::new().with("fallas", AnswerValue::Choices(vec![]));
        assert_eq!(validate_answers(&nodes, &answers).missing, ["Fallas"]);
    }

    #[test]
    fn optional_and_section_nodes_never_missing() {
        let nodes = inspecta_schema::normalize(&[RawNode::titled("Cabina")
            .required()
            .with_children(vec![RawNode::titled("Asiento").with_key("asiento")])])
        .unwrap();
        assert!(validate_answers(&nodes, &AnswerMap::new()).valid);
    }

    #[test]
    fn missing_follow_traversal_order() {
        let nodes = inspecta_schema::normalize(&[
            RawNode::titled("S").with_children(vec![required("B", "text"), required("A", "text")]),
            required("C", "number"),
        ])
        .unwrap();
        let report = validate_answers(&nodes, &AnswerMap::new());
        assert_eq!(report.missing, ["B", "A", "C"]);

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: B, A, C");
    }

    #[test]
    fn summary_elides() {
        let report = ValidationReport {
            valid: false,
            missing: vec!["a".into(), "b".into()],
        };
        assert_eq!(report.summary(1), "a...");
    }
}
