//! Untrusted authoring input
//!
//! [`RawNode`] accepts whatever an authoring UI sends: every field optional,
//! a couple of aliases, options as plain strings or objects.

use crate::node::{ChoiceOption, Node, NodeKind};
use serde::{Deserialize, Serialize};

/// Raw node as submitted by an author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<RawOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    /// Raw node with only a title
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set the explicit key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the input type name
    #[must_use]
    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.allow_multiple = Some(true);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<RawOption>) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Children, treating an absent list as empty
    #[inline]
    #[must_use]
    pub fn child_nodes(&self) -> &[RawNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Convert a normalized forest back into raw input (for re-editing)
    #[must_use]
    pub fn from_nodes(nodes: &[Node]) -> Vec<RawNode> {
        nodes.iter().map(RawNode::from).collect()
    }
}

impl From<&Node> for RawNode {
    fn from(node: &Node) -> Self {
        let (options, allow_multiple, children) = match &node.kind {
            NodeKind::Section { children } => (None, None, Some(RawNode::from_nodes(children))),
            NodeKind::Select {
                options,
                allow_multiple,
            } => (
                Some(options.iter().map(RawOption::from).collect()),
                Some(*allow_multiple),
                None,
            ),
            _ => (None, None, None),
        };
        Self {
            key: Some(node.key.to_string()),
            title: Some(node.title.clone()),
            description: Some(node.description.clone()),
            input_type: Some(node.input_type().as_str().to_string()),
            required: Some(node.required),
            allow_multiple,
            options,
            children,
        }
    }
}

/// Raw option: a bare label or an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    /// `"Cumple"`
    Label(String),
    /// `{"key": "cumple", "label": "Cumple"}` or `{"value": ..., "label": ...}`
    Entry {
        #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl RawOption {
    /// Explicit key, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Label(_) => None,
            Self::Entry { key, .. } => key.as_deref(),
        }
    }

    /// Label, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label),
            Self::Entry { label, .. } => label.as_deref(),
        }
    }
}

impl From<&ChoiceOption> for RawOption {
    fn from(option: &ChoiceOption) -> Self {
        Self::Entry {
            key: Some(option.key.clone()),
            label: Some(option.label.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_aliases() {
        let raw: RawNode = serde_json::from_value(json!({
            "label": "Luces",
            "type": "checkbox"
        }))
        .unwrap();
        assert_eq!(raw.title.as_deref(), Some("Luces"));
        assert_eq!(raw.input_type.as_deref(), Some("checkbox"));
        assert!(raw.child_nodes().is_empty());
    }

    #[test]
    fn options_accept_strings_and_objects() {
        let options: Vec<RawOption> = serde_json::from_value(json!([
            "Bueno",
            {"key": "malo", "label": "Malo"},
            {"value": "regular", "label": "Regular"}
        ]))
        .unwrap();
        assert_eq!(options[0].label(), Some("Bueno"));
        assert_eq!(options[0].key(), None);
        assert_eq!(options[1].key(), Some("malo"));
        assert_eq!(options[2].key(), Some("regular"));
    }

    #[test]
    fn builder_sets_fields() {
        let raw = RawNode::titled("Frenos")
            .with_input_type("section")
            .with_children(vec![RawNode::titled("Estado").required()]);
        assert_eq!(raw.child_nodes().len(), 1);
        assert_eq!(raw.child_nodes()[0].required, Some(true));
    }
}
