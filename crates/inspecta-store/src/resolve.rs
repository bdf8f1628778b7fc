//! Checklist resolver and public serializer
//!
//! Projects a [`ChecklistRecord`] into the [`ChecklistView`] handed to
//! clients, optionally pinned to a specific version. Records without a
//! version history go through the legacy adapter and expose a single
//! synthesized version 1.
//!
//! What happens when the requested version does not exist is a policy
//! decision, see [`VersionFallback`].

use crate::checklist::{ChecklistId, ChecklistRecord, Version};
use crate::error::ResolveError;
use crate::hash::StructureHash;
use chrono::{DateTime, Utc};
use inspecta_schema::Node;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Behavior for a requested version number that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionFallback {
    /// Serve the latest version and log a warning
    #[default]
    Latest,
    /// Fail with [`ResolveError::VersionNotFound`]
    Strict,
}

/// Public read shape of a checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistView {
    pub id: ChecklistId,
    pub name: String,
    pub description: String,
    pub equipment_type: String,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub current_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version_title: Option<String>,
    /// Number of the version `structure` belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_hash: Option<StructureHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<Version>>,
}

/// Outcome of picking a version out of a record's history
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub version: Cow<'a, Version>,
    /// The requested number was absent and the latest was served instead
    pub fell_back: bool,
}

/// Resolver with a configured fallback policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    fallback: VersionFallback,
}

impl Resolver {
    #[inline]
    #[must_use]
    pub fn new(fallback: VersionFallback) -> Self {
        Self { fallback }
    }

    #[inline]
    #[must_use]
    pub fn fallback(&self) -> VersionFallback {
        self.fallback
    }

    /// Full history, synthesizing version 1 for legacy records
    ///
    /// # Errors
    /// Returns error if the legacy structure cannot be fingerprinted
    pub fn history<'a>(&self, record: &'a ChecklistRecord) -> Result<Cow<'a, [Version]>, ResolveError> {
        if record.is_legacy() {
            tracing::warn!(checklist = %record.id, "serving legacy checklist through migration adapter");
            Ok(Cow::Owned(vec![record.legacy_version()?]))
        } else {
            Ok(Cow::Borrowed(record.versions()))
        }
    }

    /// Pick `requested` (or the latest when `None`) from the history
    ///
    /// # Errors
    /// [`ResolveError::VersionNotFound`] when `requested` is absent and the
    /// policy is [`VersionFallback::Strict`]
    pub fn select<'a>(
        &self,
        record: &'a ChecklistRecord,
        requested: Option<u32>,
    ) -> Result<Selection<'a>, ResolveError> {
        let history = self.history(record)?;
        let (index, fell_back) = self.position(record, &history, requested)?;
        let version = match history {
            Cow::Borrowed(versions) => Cow::Borrowed(&versions[index]),
            Cow::Owned(mut versions) => Cow::Owned(versions.swap_remove(index)),
        };
        Ok(Selection { version, fell_back })
    }

    fn position(
        &self,
        record: &ChecklistRecord,
        history: &[Version],
        requested: Option<u32>,
    ) -> Result<(usize, bool), ResolveError> {
        let latest = history.len().saturating_sub(1);
        let Some(number) = requested else {
            return Ok((latest, false));
        };
        if let Some(index) = history.iter().position(|v| v.version == number) {
            return Ok((index, false));
        }
        match self.fallback {
            VersionFallback::Strict => Err(ResolveError::VersionNotFound {
                id: record.id,
                requested: number,
                available: history.iter().map(|v| v.version).collect(),
            }),
            VersionFallback::Latest => {
                tracing::warn!(
                    checklist = %record.id,
                    requested = number,
                    latest = record.current_version(),
                    "requested version not found, falling back to latest"
                );
                Ok((latest, true))
            }
        }
    }

    /// Project a record into its public shape
    ///
    /// Identity and metadata are always present; the structure of the
    /// selected version, its title and notes, and the full history only
    /// when `include_structure` is set.
    ///
    /// # Errors
    /// See [`Resolver::select`]
    pub fn resolve(
        &self,
        record: &ChecklistRecord,
        include_structure: bool,
        requested: Option<u32>,
    ) -> Result<ChecklistView, ResolveError> {
        let mut view = ChecklistView {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            equipment_type: record.equipment_type.clone(),
            tags: record.tags.clone(),
            is_active: record.is_active(),
            deleted_at: record.deleted_at(),
            current_version: record.current_version(),
            structure: None,
            current_version_notes: None,
            current_version_title: None,
            resolved_version: None,
            structure_hash: None,
            versions: None,
        };
        if !include_structure {
            return Ok(view);
        }

        let history = self.history(record)?.into_owned();
        let (index, _) = self.position(record, &history, requested)?;
        let selected = history[index].clone();
        tracing::debug!(
            checklist = %record.id,
            version = selected.version,
            nodes = selected.nodes.len(),
            "resolved checklist structure"
        );
        view.versions = Some(history);
        view.current_version_notes = Some(selected.notes);
        view.current_version_title = Some(selected.title);
        view.resolved_version = Some(selected.version);
        view.structure_hash = Some(selected.structure_hash);
        view.structure = Some(selected.nodes);
        Ok(view)
    }
}

/// Resolve with the default policy ([`VersionFallback::Latest`])
///
/// # Errors
/// Only if a legacy structure cannot be fingerprinted
pub fn serialize_checklist(
    record: &ChecklistRecord,
    include_structure: bool,
    requested: Option<u32>,
) -> Result<ChecklistView, ResolveError> {
    Resolver::default().resolve(record, include_structure, requested)
}
