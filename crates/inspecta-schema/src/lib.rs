//! Inspecta Schema
//!
//! Checklist structure model and the normalizer that produces it.
//!
//! # Core Concepts
//!
//! - [`Node`]: a section or a typed, answerable question
//! - [`RawNode`]: untrusted authoring input
//! - [`Normalizer`]: turns raw input into a well-formed forest
//! - [`migrate_legacy_items`]: adapter for pre-versioning flat item lists
//! - [`walk`]: the pre-order traversal every consumer shares
//!
//! # Example
//!
//! ```rust
//! use inspecta_schema::{normalize, RawNode};
//!
//! let raw = vec![RawNode::titled("Frenos")
//!     .with_input_type("section")
//!     .with_children(vec![RawNode::titled("Estado").required()])];
//! let nodes = normalize(&raw).unwrap();
//! assert_eq!(nodes[0].children()[0].key.as_str(), "estado");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod key;
mod legacy;
mod node;
mod normalize;
mod raw;
mod tree;

pub use key::{generate_key, is_generated, slugify};
pub use legacy::{migrate_legacy_items, LegacyItem};
pub use node::{
    ChoiceOption, InputType, Node, NodeKey, NodeKind, UnknownInputType, CANONICAL_OPTIONS,
};
pub use normalize::{
    normalize, normalize_options, DerivedKeyCollision, NormalizeError, NormalizeOptions,
    Normalizer, MAX_DEPTH,
};
pub use raw::{RawNode, RawOption};
pub use tree::{find, leaves, max_depth, walk, PreOrder, TreePath};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_and_normalized_trees_share_shape() {
        let legacy: Vec<LegacyItem> =
            serde_json::from_value(json!([{"key": "estado", "label": "Estado"}])).unwrap();
        let migrated = migrate_legacy_items(&legacy);

        let normalized = normalize(&[RawNode::titled("Estado")]).unwrap();
        assert_eq!(migrated, normalized);
    }

    #[test]
    fn normalized_tree_round_trips_through_wire_format() {
        let raw: Vec<RawNode> = serde_json::from_value(json!([
            {"title": "Frenos", "children": [
                {"title": "Estado", "inputType": "select", "required": true},
                {"title": "Pastillas", "inputType": "number"}
            ]}
        ]))
        .unwrap();
        let nodes = normalize(&raw).unwrap();

        let wire = serde_json::to_value(&nodes).unwrap();
        assert_eq!(wire[0]["inputType"], json!("section"));
        assert_eq!(wire[0]["children"][1]["inputType"], json!("number"));

        let decoded: Vec<Node> = serde_json::from_value(wire).unwrap();
        assert_eq!(decoded, nodes);
    }
}
