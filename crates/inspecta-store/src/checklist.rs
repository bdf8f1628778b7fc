//! Checklist records and their version history
//!
//! A [`ChecklistRecord`] owns an append-only list of [`Version`] snapshots.
//! Nothing in this module hands out mutable access to a stored version:
//! structural edits go through [`ChecklistRecord::append_version`], which
//! only ever pushes `current + 1`.

use crate::error::StoreError;
use crate::hash::{HashError, StructureHash};
use chrono::{DateTime, Utc};
use inspecta_schema::{migrate_legacy_items, LegacyItem, Node};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Author recorded on versions synthesized from legacy item lists
pub const LEGACY_AUTHOR: &str = "legacy-migration";

/// Unique checklist identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistId(pub Ulid);

impl ChecklistId {
    /// Generate new checklist ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ChecklistId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChecklistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChecklistId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

/// Immutable snapshot of a checklist structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// 1-based, monotonic per checklist
    pub version: u32,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub notes: String,
    pub nodes: Vec<Node>,
    /// Zero for versions stored before fingerprints existed
    #[serde(default)]
    pub structure_hash: StructureHash,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl Version {
    fn build(
        version: u32,
        meta: VersionMeta,
        nodes: Vec<Node>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, HashError> {
        let structure_hash = StructureHash::of(&nodes)?;
        Ok(Self {
            version,
            title: meta.title,
            summary: meta.summary,
            notes: meta.notes,
            nodes,
            structure_hash,
            created_at,
            created_by: meta.created_by,
        })
    }

    /// Check the stored fingerprint against the snapshot
    ///
    /// Versions without a fingerprint (zero hash) cannot be verified and
    /// report `false`.
    #[must_use]
    pub fn verify(&self) -> bool {
        !self.structure_hash.is_zero()
            && StructureHash::of(&self.nodes).is_ok_and(|h| h == self.structure_hash)
    }
}

/// Author-supplied metadata for a new version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_by: String,
}

impl VersionMeta {
    #[must_use]
    pub fn new(title: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created_by: created_by.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Identity and metadata of a new checklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equipment_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ChecklistDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, equipment_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            equipment_type: equipment_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial metadata update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub equipment_type: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Persisted checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistRecord {
    pub id: ChecklistId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equipment_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    current_version: u32,
    #[serde(default)]
    versions: Vec<Version>,
    /// Pre-versioning flat item list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    items: Vec<LegacyItem>,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl ChecklistRecord {
    /// New checklist whose structure becomes version 1
    ///
    /// # Errors
    /// Returns error if the structure cannot be fingerprinted
    pub fn create(
        draft: ChecklistDraft,
        meta: VersionMeta,
        nodes: Vec<Node>,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let first = Version::build(1, meta, nodes, now)?;
        Ok(Self {
            id: ChecklistId::new(),
            name: draft.name,
            description: draft.description,
            equipment_type: draft.equipment_type,
            tags: draft.tags,
            current_version: 1,
            versions: vec![first],
            items: Vec::new(),
            is_active: true,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Record in the pre-versioning shape (flat items, no history)
    #[must_use]
    pub fn legacy(draft: ChecklistDraft, items: Vec<LegacyItem>, now: DateTime<Utc>) -> Self {
        Self {
            id: ChecklistId::new(),
            name: draft.name,
            description: draft.description,
            equipment_type: draft.equipment_type,
            tags: draft.tags,
            current_version: 1,
            versions: Vec::new(),
            items,
            is_active: true,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of the latest version
    #[inline]
    #[must_use]
    pub fn current_version(&self) -> u32 {
        self.versions
            .last()
            .map_or(self.current_version.max(1), |v| v.version)
    }

    /// Stored history (empty for legacy records)
    #[inline]
    #[must_use]
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    #[inline]
    #[must_use]
    pub fn version(&self, number: u32) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == number)
    }

    #[inline]
    #[must_use]
    pub fn latest_version(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Stored without a version history
    #[inline]
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.versions.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn legacy_items(&self) -> &[LegacyItem] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[inline]
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Version 1 synthesized from the legacy item list
    ///
    /// # Errors
    /// Returns error if the structure cannot be fingerprinted
    pub fn legacy_version(&self) -> Result<Version, HashError> {
        let meta = VersionMeta {
            title: self.name.clone(),
            summary: String::new(),
            notes: String::new(),
            created_by: LEGACY_AUTHOR.to_string(),
        };
        Version::build(1, meta, migrate_legacy_items(&self.items), self.created_at)
    }

    /// Append `current + 1`
    ///
    /// With `expected` set, fails unless it equals the current version
    /// (optimistic concurrency). A legacy record first gets its migrated
    /// version 1 materialized so the history stays complete.
    ///
    /// # Errors
    /// - [`StoreError::Deleted`] on a soft-deleted checklist
    /// - [`StoreError::VersionConflict`] when `expected` is stale
    pub fn append_version(
        &mut self,
        meta: VersionMeta,
        nodes: Vec<Node>,
        expected: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<&Version, StoreError> {
        self.ensure_live()?;
        let actual = self.current_version();
        if let Some(expected) = expected {
            if expected != actual {
                return Err(StoreError::VersionConflict {
                    id: self.id,
                    expected,
                    actual,
                });
            }
        }

        let mut history = if self.is_legacy() {
            vec![self.legacy_version()?]
        } else {
            Vec::new()
        };
        history.push(Version::build(actual + 1, meta, nodes, now)?);

        self.versions.append(&mut history);
        self.items.clear();
        self.current_version = actual + 1;
        self.updated_at = now;
        Ok(&self.versions[self.versions.len() - 1])
    }

    /// Apply a metadata patch (no new version)
    ///
    /// # Errors
    /// Returns [`StoreError::Deleted`] on a soft-deleted checklist
    pub fn update_metadata(&mut self, patch: MetadataPatch, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.ensure_live()?;
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(equipment_type) = patch.equipment_type {
            self.equipment_type = equipment_type;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now;
        Ok(())
    }

    /// # Errors
    /// Returns [`StoreError::Deleted`] on a soft-deleted checklist
    pub fn set_active(&mut self, active: bool, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.ensure_live()?;
        self.is_active = active;
        self.updated_at = now;
        Ok(())
    }

    /// Soft-delete: deactivates and stamps `deleted_at`
    ///
    /// # Errors
    /// Returns [`StoreError::Deleted`] if already deleted
    pub fn soft_delete(&mut self, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.ensure_live()?;
        self.deleted_at = Some(now);
        self.is_active = false;
        self.updated_at = now;
        Ok(())
    }

    /// Undo a soft delete; no-op on a live checklist
    pub fn restore(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.take().is_some() {
            self.is_active = true;
            self.updated_at = now;
        }
    }

    fn ensure_live(&self) -> Result<(), StoreError> {
        if self.is_deleted() {
            Err(StoreError::Deleted(self.id))
        } else {
            Ok(())
        }
    }
}
