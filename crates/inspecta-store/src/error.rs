//! Error types for the store boundary and the resolver

use crate::checklist::ChecklistId;
use crate::hash::HashError;

/// Store and lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No checklist with this id
    #[error("checklist not found: {0}")]
    NotFound(ChecklistId),

    /// Insert of an id that is already present
    #[error("checklist already exists: {0}")]
    AlreadyExists(ChecklistId),

    /// Edit attempted on a soft-deleted checklist
    #[error("checklist is deleted: {0}")]
    Deleted(ChecklistId),

    /// Optimistic concurrency check failed
    #[error("version conflict on {id}: expected current version {expected}, found {actual}")]
    VersionConflict {
        id: ChecklistId,
        expected: u32,
        actual: u32,
    },

    /// Structure fingerprint could not be computed
    #[error("structure hash failed: {0}")]
    Hash(#[from] HashError),
}

impl StoreError {
    /// Whether repeating the operation against fresh state may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Resolver errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Requested version absent and fallback is strict
    #[error("version {requested} not found for {id} (available: {available:?})")]
    VersionNotFound {
        id: ChecklistId,
        requested: u32,
        available: Vec<u32>,
    },

    /// Legacy migration could not fingerprint the synthesized version
    #[error("structure hash failed: {0}")]
    Hash(#[from] HashError),
}
