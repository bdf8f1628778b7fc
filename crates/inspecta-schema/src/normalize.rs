//! Node normalizer
//!
//! Turns an untrusted [`RawNode`] forest into a well-formed [`Node`] forest:
//! canonical keys unique across the whole tree, non-blank titles, resolved
//! input types, canonical options on selects and bounded depth.
//!
//! Normalization is all-or-nothing and never touches its input.

use crate::key::{disambiguate, generate_key, slugify};
use crate::node::{ChoiceOption, InputType, Node, NodeKey, NodeKind};
use crate::raw::{RawNode, RawOption};
use crate::tree::TreePath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default maximum tree depth (root nodes are depth 1)
pub const MAX_DEPTH: usize = 8;

/// What to do when a key derived from a title is already taken
///
/// Explicit keys are never rewritten: a duplicate explicit key always fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedKeyCollision {
    /// Fail with [`NormalizeError::DuplicateKey`]
    #[default]
    Reject,
    /// Append `_2`, `_3`, ... to the derived key
    Disambiguate,
}

/// Normalizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Deepest level allowed
    pub max_depth: usize,
    /// Policy for title-derived key collisions
    pub derived_key_collision: DerivedKeyCollision,
}

impl NormalizeOptions {
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_derived_key_collision(mut self, policy: DerivedKeyCollision) -> Self {
        self.derived_key_collision = policy;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            derived_key_collision: DerivedKeyCollision::Reject,
        }
    }
}

/// Structural violations found while normalizing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Key already used elsewhere in the tree
    #[error("duplicate key '{key}' at {path}")]
    DuplicateKey { key: String, path: TreePath },

    /// Title absent or blank
    #[error("missing title at {path}")]
    MissingTitle { path: TreePath },

    /// Node nested deeper than allowed
    #[error("depth {depth} exceeds maximum of {max_depth} at {path}")]
    DepthExceeded {
        path: TreePath,
        depth: usize,
        max_depth: usize,
    },

    /// `inputType` names no known type
    #[error("unknown input type {value:?} at {path}")]
    UnknownInputType { value: String, path: TreePath },

    /// Answerable node declared with children
    #[error("{input_type} node at {path} cannot have children")]
    ChildrenOnLeaf {
        input_type: InputType,
        path: TreePath,
    },
}

impl NormalizeError {
    /// Path of the offending node
    #[must_use]
    pub fn path(&self) -> &TreePath {
        match self {
            Self::DuplicateKey { path, .. }
            | Self::MissingTitle { path }
            | Self::DepthExceeded { path, .. }
            | Self::UnknownInputType { path, .. }
            | Self::ChildrenOnLeaf { path, .. } => path,
        }
    }
}

/// Tree normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Normalizer with default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self { options }
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize a raw forest
    ///
    /// # Errors
    /// Returns the first structural violation found, in pre-order.
    pub fn normalize(&self, raw: &[RawNode]) -> Result<Vec<Node>, NormalizeError> {
        let mut claims = KeyClaims::new(raw);
        let nodes = self.normalize_level(raw, 1, &TreePath::root(), &mut claims)?;
        tracing::debug!(nodes = claims.keys.len(), roots = nodes.len(), "normalized checklist tree");
        Ok(nodes)
    }

    fn normalize_level(
        &self,
        raw: &[RawNode],
        depth: usize,
        parent: &TreePath,
        claims: &mut KeyClaims,
    ) -> Result<Vec<Node>, NormalizeError> {
        raw.iter()
            .enumerate()
            .map(|(index, node)| self.normalize_node(node, depth, parent.child(index), claims))
            .collect()
    }

    fn normalize_node(
        &self,
        raw: &RawNode,
        depth: usize,
        path: TreePath,
        claims: &mut KeyClaims,
    ) -> Result<Node, NormalizeError> {
        if depth > self.options.max_depth {
            return Err(NormalizeError::DepthExceeded {
                path,
                depth,
                max_depth: self.options.max_depth,
            });
        }

        let key = self.derive_key(raw, &path, claims)?;

        let title = raw.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(NormalizeError::MissingTitle { path });
        }

        let input_type = resolve_input_type(raw, &path)?;
        let kind = match input_type {
            InputType::Section => NodeKind::Section {
                children: self.normalize_level(raw.child_nodes(), depth + 1, &path, claims)?,
            },
            leaf if !raw.child_nodes().is_empty() => {
                return Err(NormalizeError::ChildrenOnLeaf {
                    input_type: leaf,
                    path,
                });
            }
            InputType::Select => NodeKind::Select {
                options: normalize_options(raw.options.as_deref().unwrap_or_default()),
                allow_multiple: raw.allow_multiple.unwrap_or(false),
            },
            InputType::Text => NodeKind::Text,
            InputType::Number => NodeKind::Number,
            InputType::Checkbox => NodeKind::Checkbox,
            InputType::Textarea => NodeKind::Textarea,
        };

        Ok(Node {
            key: NodeKey::new(key),
            title: title.to_string(),
            description: raw
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            required: raw.required.unwrap_or(false),
            kind,
        })
    }

    fn derive_key(
        &self,
        raw: &RawNode,
        path: &TreePath,
        claims: &mut KeyClaims,
    ) -> Result<String, NormalizeError> {
        if let Some(key) = explicit_key(raw) {
            return claims.claim(key, path);
        }

        match raw.title.as_deref().map(slugify).filter(|k| !k.is_empty()) {
            Some(base) => match self.options.derived_key_collision {
                DerivedKeyCollision::Reject => claims.claim(base, path),
                DerivedKeyCollision::Disambiguate => {
                    let key = disambiguate(&base, |candidate| claims.is_taken(candidate));
                    claims.claim(key, path)
                }
            },
            None => {
                let key = std::iter::repeat_with(generate_key)
                    .find(|candidate| !claims.is_taken(candidate))
                    .unwrap_or_else(generate_key);
                claims.claim(key, path)
            }
        }
    }
}

fn explicit_key(raw: &RawNode) -> Option<String> {
    raw.key.as_deref().map(slugify).filter(|k| !k.is_empty())
}

/// Keys handed out during one normalization
///
/// Explicit keys anywhere in the input are reserved up front, so a renamed
/// derived key never lands on a key some later node asks for by name.
struct KeyClaims {
    keys: HashSet<String>,
    reserved: HashSet<String>,
}

impl KeyClaims {
    fn new(raw: &[RawNode]) -> Self {
        let mut reserved = HashSet::new();
        let mut stack: Vec<&RawNode> = raw.iter().collect();
        while let Some(node) = stack.pop() {
            reserved.extend(explicit_key(node));
            stack.extend(node.child_nodes());
        }
        Self {
            keys: HashSet::new(),
            reserved,
        }
    }

    fn is_taken(&self, key: &str) -> bool {
        self.keys.contains(key) || self.reserved.contains(key)
    }

    fn claim(&mut self, key: String, path: &TreePath) -> Result<String, NormalizeError> {
        if self.keys.insert(key.clone()) {
            Ok(key)
        } else {
            Err(NormalizeError::DuplicateKey {
                key,
                path: path.clone(),
            })
        }
    }
}

fn resolve_input_type(raw: &RawNode, path: &TreePath) -> Result<InputType, NormalizeError> {
    match raw.input_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(name) => name
            .parse()
            .map_err(|_| NormalizeError::UnknownInputType {
                value: name.to_string(),
                path: path.clone(),
            }),
        None if raw.child_nodes().is_empty() => Ok(InputType::Select),
        None => Ok(InputType::Section),
    }
}

/// Normalize select options
///
/// Each option gets a slug key (from its key, else its label); blank options
/// are dropped and repeated keys get a numeric suffix. An empty result falls
/// back to [`ChoiceOption::canonical`].
#[must_use]
pub fn normalize_options(raw: &[RawOption]) -> Vec<ChoiceOption> {
    let mut options: Vec<ChoiceOption> = Vec::with_capacity(raw.len());
    for (index, option) in raw.iter().enumerate() {
        let label = option
            .label()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or_else(|| option.key().map(str::trim).filter(|k| !k.is_empty()));
        let Some(label) = label else { continue };

        let mut base = slugify(option.key().unwrap_or(label));
        if base.is_empty() {
            base = slugify(label);
        }
        if base.is_empty() {
            base = format!("opt_{}", index + 1);
        }
        let key = disambiguate(&base, |candidate| options.iter().any(|o| o.key == candidate));
        options.push(ChoiceOption::new(key, label));
    }

    if options.is_empty() {
        ChoiceOption::canonical()
    } else {
        options
    }
}

/// Normalize with [`NormalizeOptions::default`]
///
/// # Errors
/// See [`Normalizer::normalize`].
pub fn normalize(raw: &[RawNode]) -> Result<Vec<Node>, NormalizeError> {
    Normalizer::new().normalize(raw)
}
