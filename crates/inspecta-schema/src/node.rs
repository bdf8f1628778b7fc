//! Checklist node model
//!
//! A checklist structure is a forest of [`Node`]s. Common fields live on the
//! node itself; everything that only makes sense for one input type lives in
//! the [`NodeKind`] tagged union.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Canonical answer choices for `select` nodes without explicit options
pub const CANONICAL_OPTIONS: [(&str, &str); 3] = [
    ("cumple", "Cumple"),
    ("no_cumple", "No cumple"),
    ("no_aplica", "No aplica"),
];

/// Node key, unique across the whole tree
///
/// Keys produced by the normalizer only contain `[a-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    /// Wrap a key that is already canonical
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One selectable answer of a `select` node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Stable option key (stored as the answer value)
    pub key: String,
    /// Human-readable label
    pub label: String,
}

impl ChoiceOption {
    /// Create new option
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// The three canonical choices: comply / does not comply / not applicable
    #[must_use]
    pub fn canonical() -> Vec<Self> {
        CANONICAL_OPTIONS
            .iter()
            .map(|(key, label)| Self::new(*key, *label))
            .collect()
    }
}

/// Input type discriminant
///
/// Mirrors the `inputType` tag of the serialized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Grouping node, never answered
    Section,
    /// Single or multiple choice
    Select,
    /// Single-line free text
    Text,
    /// Numeric entry (stored as text)
    Number,
    /// Yes/no flag
    Checkbox,
    /// Multi-line free text
    Textarea,
}

impl InputType {
    /// All input types, in declaration order
    pub const ALL: [InputType; 6] = [
        Self::Section,
        Self::Select,
        Self::Text,
        Self::Number,
        Self::Checkbox,
        Self::Textarea,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Select => "select",
            Self::Text => "text",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Textarea => "textarea",
        }
    }

    /// Whether nodes of this type group other nodes
    #[inline]
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section)
    }
}

impl Display for InputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = UnknownInputType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownInputType(s.to_string()))
    }
}

/// Returned when an input type name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown input type: {0:?}")]
pub struct UnknownInputType(pub String);

/// Well-formed checklist node
///
/// Only produced by the normalizer or the legacy adapter; deserializing a
/// stored snapshot trusts that it was normalized when it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Tree-unique key
    pub key: NodeKey,
    /// Display title (never blank)
    pub title: String,
    /// Optional help text
    #[serde(default)]
    pub description: String,
    /// Whether an answer is mandatory (meaningless on sections)
    #[serde(default)]
    pub required: bool,
    /// Type-specific payload
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Type-specific part of a node, tagged by `inputType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "inputType", rename_all = "lowercase")]
pub enum NodeKind {
    /// Groups child nodes
    Section {
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Choice among options
    Select {
        options: Vec<ChoiceOption>,
        #[serde(default, rename = "allowMultiple")]
        allow_multiple: bool,
    },
    /// Single-line text
    Text,
    /// Number entered as text
    Number,
    /// Boolean flag
    Checkbox,
    /// Multi-line text
    Textarea,
}

impl NodeKind {
    /// Discriminant of this kind
    #[inline]
    #[must_use]
    pub fn input_type(&self) -> InputType {
        match self {
            Self::Section { .. } => InputType::Section,
            Self::Select { .. } => InputType::Select,
            Self::Text => InputType::Text,
            Self::Number => InputType::Number,
            Self::Checkbox => InputType::Checkbox,
            Self::Textarea => InputType::Textarea,
        }
    }
}

impl Node {
    /// Input type of this node
    #[inline]
    #[must_use]
    pub fn input_type(&self) -> InputType {
        self.kind.input_type()
    }

    #[inline]
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self.kind, NodeKind::Section { .. })
    }

    /// Answerable node (anything but a section)
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.is_section()
    }

    /// Child nodes (empty for leaves)
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Section { children } => children,
            _ => &[],
        }
    }

    /// Options of a select node
    #[inline]
    #[must_use]
    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match &self.kind {
            NodeKind::Select { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Whether a select node accepts several options
    #[inline]
    #[must_use]
    pub fn allow_multiple(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Select {
                allow_multiple: true,
                ..
            }
        )
    }

    /// Title, or the key when the title is blank
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            self.key.as_str()
        } else {
            &self.title
        }
    }
}
