//! Tree addressing and traversal
//!
//! [`TreePath`] names a position in a raw or normalized tree for error
//! reporting; [`walk`] is the single pre-order traversal every consumer of a
//! normalized tree goes through, so that flat outputs derived from the same
//! tree always line up.

use crate::node::Node;
use std::fmt::{self, Display, Formatter};

/// Positional path inside a node forest
///
/// Rendered as `$[0].children[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath(Vec<usize>);

impl TreePath {
    /// Root of the forest (no position yet)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th child below this one
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.0.push(index);
        next
    }

    /// Number of levels (root nodes have depth 1)
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for (level, index) in self.0.iter().enumerate() {
            if level == 0 {
                write!(f, "[{index}]")?;
            } else {
                write!(f, ".children[{index}]")?;
            }
        }
        Ok(())
    }
}

/// Pre-order iterator over a node forest
///
/// Yields each node together with its depth (root nodes are depth 1).
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// Walk every node of a forest in pre-order
#[must_use]
pub fn walk(nodes: &[Node]) -> PreOrder<'_> {
    PreOrder {
        stack: nodes.iter().rev().map(|n| (1, n)).collect(),
    }
}

/// Walk only answerable (non-section) nodes, in pre-order
pub fn leaves(nodes: &[Node]) -> impl Iterator<Item = &Node> {
    walk(nodes).map(|(_, n)| n).filter(|n| n.is_leaf())
}

/// Deepest level of the forest (0 for an empty forest)
#[must_use]
pub fn max_depth(nodes: &[Node]) -> usize {
    walk(nodes).map(|(depth, _)| depth).max().unwrap_or(0)
}

/// Find a node by key anywhere in the forest
#[must_use]
pub fn find<'a>(nodes: &'a [Node], key: &str) -> Option<&'a Node> {
    walk(nodes).map(|(_, n)| n).find(|n| n.key.as_str() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKey, NodeKind};

    fn leaf(key: &str) -> Node {
        Node {
            key: NodeKey::new(key),
            title: key.to_string(),
            description: String::new(),
            required: false,
            kind: NodeKind::Text,
        }
    }

    fn section(key: &str, children: Vec<Node>) -> Node {
        Node {
            kind: NodeKind::Section { children },
            ..leaf(key)
        }
    }

    fn sample() -> Vec<Node> {
        vec![
            section("s1", vec![leaf("a"), section("s2", vec![leaf("b")])]),
            leaf("c"),
        ]
    }

    #[test]
    fn path_display() {
        assert_eq!(TreePath::root().to_string(), "$");
        let path = TreePath::root().child(0).child(3);
        assert_eq!(path.to_string(), "$[0].children[3]");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn walk_is_pre_order() {
        let forest = sample();
        let keys: Vec<_> = walk(&forest).map(|(_, n)| n.key.as_str()).collect();
        assert_eq!(keys, ["s1", "a", "s2", "b", "c"]);
    }

    #[test]
    fn walk_reports_depth() {
        let forest = sample();
        let depths: Vec<_> = walk(&forest).map(|(d, _)| d).collect();
        assert_eq!(depths, [1, 2, 2, 3, 1]);
        assert_eq!(max_depth(&forest), 3);
        assert_eq!(max_depth(&[]), 0);
    }

    #[test]
    fn leaves_skip_sections() {
        let forest = sample();
        let keys: Vec<_> = leaves(&forest).map(|n| n.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn find_by_key() {
        let forest = sample();
        assert!(find(&forest, "b").is_some());
        assert!(find(&forest, "zz").is_none());
    }
}
