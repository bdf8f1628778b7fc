//! Persistence boundary
//!
//! [`ChecklistStore`] is the contract the engine needs from persistence:
//! insert, read by id, list, and atomic record mutations. Appending a version
//! must be a single read-modify-write so two concurrent publishes can never
//! both claim the same version number.
//!
//! [`InMemoryStore`] keeps records in a `DashMap`; every mutation runs under
//! that entry's shard lock.

use crate::checklist::{ChecklistId, ChecklistRecord, MetadataPatch, Version, VersionMeta};
use crate::error::StoreError;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use inspecta_schema::Node;

/// Single-record mutation applied atomically by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordChange {
    /// Metadata edit, no new version
    Metadata(MetadataPatch),
    /// Activate or deactivate
    SetActive(bool),
    SoftDelete,
    Restore,
}

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistFilter {
    /// Also return soft-deleted checklists
    pub include_deleted: bool,
    pub equipment_type: Option<String>,
    pub tag: Option<String>,
}

impl ChecklistFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    #[must_use]
    pub fn with_equipment_type(mut self, equipment_type: impl Into<String>) -> Self {
        self.equipment_type = Some(equipment_type.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether a record passes this filter
    #[must_use]
    pub fn matches(&self, record: &ChecklistRecord) -> bool {
        (self.include_deleted || !record.is_deleted())
            && self
                .equipment_type
                .as_deref()
                .map_or(true, |t| record.equipment_type == t)
            && self
                .tag
                .as_deref()
                .map_or(true, |t| record.tags.iter().any(|tag| tag == t))
    }
}

/// Checklist persistence contract
#[async_trait::async_trait]
pub trait ChecklistStore: Send + Sync {
    /// Store a new record
    async fn insert(&self, record: ChecklistRecord) -> Result<(), StoreError>;

    /// Read a record by id
    async fn get(&self, id: ChecklistId) -> Result<ChecklistRecord, StoreError>;

    /// Atomically append `current + 1`
    ///
    /// `expected` enables optimistic concurrency: the append fails with
    /// [`StoreError::VersionConflict`] unless it equals the current version.
    async fn append_version(
        &self,
        id: ChecklistId,
        meta: VersionMeta,
        nodes: Vec<Node>,
        expected: Option<u32>,
    ) -> Result<Version, StoreError>;

    /// Atomically apply a non-structural change
    async fn apply(&self, id: ChecklistId, change: RecordChange) -> Result<ChecklistRecord, StoreError>;

    /// Records passing `filter`, oldest first
    async fn list(&self, filter: &ChecklistFilter) -> Result<Vec<ChecklistRecord>, StoreError>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<ChecklistId, ChecklistRecord>,
}

impl InMemoryStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl ChecklistStore for InMemoryStore {
    async fn insert(&self, record: ChecklistRecord) -> Result<(), StoreError> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, id: ChecklistId) -> Result<ChecklistRecord, StoreError> {
        self.records
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn append_version(
        &self,
        id: ChecklistId,
        meta: VersionMeta,
        nodes: Vec<Node>,
        expected: Option<u32>,
    ) -> Result<Version, StoreError> {
        let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let version = record.append_version(meta, nodes, expected, Utc::now())?.clone();
        tracing::debug!(checklist = %id, version = version.version, "appended checklist version");
        Ok(version)
    }

    async fn apply(&self, id: ChecklistId, change: RecordChange) -> Result<ChecklistRecord, StoreError> {
        let mut record = self.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let now = Utc::now();
        match change {
            RecordChange::Metadata(patch) => record.update_metadata(patch, now)?,
            RecordChange::SetActive(active) => record.set_active(active, now)?,
            RecordChange::SoftDelete => record.soft_delete(now)?,
            RecordChange::Restore => record.restore(now),
        }
        Ok(record.value().clone())
    }

    async fn list(&self, filter: &ChecklistFilter) -> Result<Vec<ChecklistRecord>, StoreError> {
        let mut records: Vec<ChecklistRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::ChecklistDraft;
    use inspecta_schema::{normalize, RawNode};
    use std::sync::Arc;

    fn tree(title: &str) -> Vec<Node> {
        normalize(&[RawNode::titled(title)]).unwrap()
    }

    fn record(name: &str, equipment: &str, tags: &[&str]) -> ChecklistRecord {
        ChecklistRecord::create(
            ChecklistDraft::new(name, equipment).with_tags(tags.iter().copied()),
            VersionMeta::new("v1", "ana"),
            tree("Estado"),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryStore::new();
        let rec = record("Camión", "truck", &[]);
        let id = rec.id;
        store.insert(rec.clone()).await.unwrap();

        assert_eq!(store.get(id).await.unwrap(), rec);
        assert!(matches!(
            store.insert(rec).await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert!(matches!(
            store.get(ChecklistId::new()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn append_goes_through_store() {
        let store = InMemoryStore::new();
        let rec = record("Camión", "truck", &[]);
        let id = rec.id;
        store.insert(rec).await.unwrap();

        let v2 = store
            .append_version(id, VersionMeta::new("v2", "ana"), tree("Luces"), Some(1))
            .await
            .unwrap();
        assert_eq!(v2.version, 2);
        assert_eq!(store.get(id).await.unwrap().current_version(), 2);

        let stale = store
            .append_version(id, VersionMeta::new("v3", "ana"), tree("Luces"), Some(1))
            .await;
        assert!(matches!(stale, Err(StoreError::VersionConflict { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_get_distinct_versions() {
        let store = Arc::new(InMemoryStore::new());
        let rec = record("Camión", "truck", &[]);
        let id = rec.id;
        store.insert(rec).await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .append_version(id, VersionMeta::new(format!("v{i}"), "ana"), tree("X"), None)
                        .await
                        .unwrap()
                        .version
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for task in tasks {
            numbers.push(task.await.unwrap());
        }
        numbers.sort_unstable();
        assert_eq!(numbers, (2..=17).collect::<Vec<u32>>());
        assert_eq!(store.get(id).await.unwrap().current_version(), 17);
    }

    #[tokio::test]
    async fn apply_changes_lifecycle() {
        let store = InMemoryStore::new();
        let rec = record("Camión", "truck", &[]);
        let id = rec.id;
        store.insert(rec).await.unwrap();

        let deleted = store.apply(id, RecordChange::SoftDelete).await.unwrap();
        assert!(deleted.is_deleted());
        assert!(matches!(
            store.apply(id, RecordChange::SetActive(true)).await,
            Err(StoreError::Deleted(_))
        ));

        let restored = store.apply(id, RecordChange::Restore).await.unwrap();
        assert!(!restored.is_deleted());
        assert_eq!(restored.current_version(), 1);
    }

    #[tokio::test]
    async fn list_filters() {
        let store = InMemoryStore::new();
        let truck = record("Camión", "truck", &["flota"]);
        let crane = record("Grúa", "crane", &[]);
        let gone = record("Viejo", "truck", &["flota"]);
        let gone_id = gone.id;
        for rec in [truck, crane, gone] {
            store.insert(rec).await.unwrap();
        }
        store.apply(gone_id, RecordChange::SoftDelete).await.unwrap();

        assert_eq!(store.list(&ChecklistFilter::new()).await.unwrap().len(), 2);
        assert_eq!(
            store
                .list(&ChecklistFilter::new().with_deleted())
                .await
                .unwrap()
                .len(),
            3
        );
        let trucks = store
            .list(&ChecklistFilter::new().with_equipment_type("truck"))
            .await
            .unwrap();
        assert_eq!(trucks.len(), 1);
        assert_eq!(trucks[0].name, "Camión");
        let tagged = store
            .list(&ChecklistFilter::new().with_deleted().with_tag("flota"))
            .await
            .unwrap();
        assert_eq!(tagged.len(), 2);
    }
}
