//! Inspecta Store
//!
//! Append-only checklist version history, the persistence boundary and the
//! public resolver.
//!
//! # Core Concepts
//!
//! - [`ChecklistRecord`]: a named checklist owning its [`Version`] history
//! - [`StructureHash`]: Blake3 fingerprint of a version snapshot
//! - [`ChecklistStore`]: persistence contract (atomic version append)
//! - [`Resolver`]: projects a record into a [`ChecklistView`]
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use inspecta_schema::{normalize, RawNode};
//! use inspecta_store::{serialize_checklist, ChecklistDraft, ChecklistRecord, VersionMeta};
//!
//! let nodes = normalize(&[RawNode::titled("Estado")]).unwrap();
//! let record = ChecklistRecord::create(
//!     ChecklistDraft::new("Camión", "truck"),
//!     VersionMeta::new("Inicial", "ana"),
//!     nodes,
//!     Utc::now(),
//! )
//! .unwrap();
//!
//! let view = serialize_checklist(&record, true, None).unwrap();
//! assert_eq!(view.resolved_version, Some(1));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod checklist;
mod error;
mod hash;
mod resolve;
mod store;

pub use checklist::{
    ChecklistDraft, ChecklistId, ChecklistRecord, MetadataPatch, Version, VersionMeta,
    LEGACY_AUTHOR,
};
pub use error::{ResolveError, StoreError};
pub use hash::{HashError, StructureHash};
pub use resolve::{serialize_checklist, ChecklistView, Resolver, Selection, VersionFallback};
pub use store::{ChecklistFilter, ChecklistStore, InMemoryStore, RecordChange};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
