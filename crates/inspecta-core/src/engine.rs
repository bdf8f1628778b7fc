//! Checklist engine
//!
//! Ties the normalizer, the store and the answer pipeline together. Every
//! structural edit goes through the configured [`Normalizer`] before it
//! reaches the store, and every evaluation is validated against the exact
//! version it was answered on.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::evaluation::{EvaluationPayload, EvaluationRequest};
use chrono::Utc;
use inspecta_answers::{
    build_initial_answers, collect_responses_with_notes, reconcile_answers, validate_answers,
    AnswerMap, ValidationReport,
};
use inspecta_schema::{LegacyItem, Node, Normalizer, RawNode};
use inspecta_store::{
    ChecklistDraft, ChecklistFilter, ChecklistId, ChecklistRecord, ChecklistStore, ChecklistView,
    InMemoryStore, MetadataPatch, RecordChange, Resolver, Version, VersionMeta,
};
use std::sync::Arc;

/// Checklist engine over a store
pub struct ChecklistEngine<S: ChecklistStore = InMemoryStore> {
    store: Arc<S>,
    config: EngineConfig,
    normalizer: Normalizer,
    resolver: Resolver,
}

impl ChecklistEngine<InMemoryStore> {
    /// Engine over a fresh in-memory store
    #[must_use]
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), config)
    }
}

impl<S: ChecklistStore> ChecklistEngine<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            normalizer: config.normalizer(),
            resolver: config.resolver(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Normalize authoring input with the configured options
    ///
    /// # Errors
    /// Returns [`EngineError::Normalize`] on malformed input
    pub fn normalize(&self, raw: &[RawNode]) -> Result<Vec<Node>, EngineError> {
        Ok(self.normalizer.normalize(raw)?)
    }

    /// Create a checklist whose normalized structure becomes version 1
    ///
    /// # Errors
    /// Returns error if the structure is malformed or the store rejects it
    pub async fn create_checklist(
        &self,
        draft: ChecklistDraft,
        meta: VersionMeta,
        raw: &[RawNode],
    ) -> Result<ChecklistRecord, EngineError> {
        let nodes = self.normalize(raw)?;
        let record = ChecklistRecord::create(draft, meta, nodes, Utc::now())?;
        self.store.insert(record.clone()).await?;
        tracing::info!(
            checklist = %record.id,
            name = %record.name,
            hash = %record.versions()[0].structure_hash.short(),
            "created checklist"
        );
        Ok(record)
    }

    /// Store a pre-versioning record as-is
    ///
    /// Its structure is served through the legacy adapter until the first
    /// publish materializes version 1.
    ///
    /// # Errors
    /// Returns error if the store rejects the record
    pub async fn import_legacy(
        &self,
        draft: ChecklistDraft,
        items: Vec<LegacyItem>,
    ) -> Result<ChecklistRecord, EngineError> {
        let record = ChecklistRecord::legacy(draft, items, Utc::now());
        self.store.insert(record.clone()).await?;
        tracing::info!(
            checklist = %record.id,
            items = record.legacy_items().len(),
            "imported legacy checklist"
        );
        Ok(record)
    }

    /// Publish an edited structure as the next version
    ///
    /// `expected` is the version the editor started from; a concurrent
    /// publish in between fails with a retryable conflict.
    ///
    /// # Errors
    /// Returns error on malformed input, a stale `expected`, or a deleted or
    /// missing checklist
    pub async fn publish_version(
        &self,
        id: ChecklistId,
        meta: VersionMeta,
        raw: &[RawNode],
        expected: Option<u32>,
    ) -> Result<Version, EngineError> {
        let nodes = self.normalize(raw)?;
        let version = self.store.append_version(id, meta, nodes, expected).await?;
        tracing::info!(
            checklist = %id,
            version = version.version,
            hash = %version.structure_hash.short(),
            "published checklist version"
        );
        Ok(version)
    }

    /// # Errors
    /// Returns [`EngineError::Store`] if the checklist does not exist
    pub async fn get(&self, id: ChecklistId) -> Result<ChecklistRecord, EngineError> {
        Ok(self.store.get(id).await?)
    }

    /// Public view of a checklist, optionally pinned to a version
    ///
    /// # Errors
    /// Returns error if the checklist does not exist, or if the version does
    /// not exist under a strict fallback policy
    pub async fn resolve(
        &self,
        id: ChecklistId,
        include_structure: bool,
        version: Option<u32>,
    ) -> Result<ChecklistView, EngineError> {
        let record = self.store.get(id).await?;
        Ok(self.resolver.resolve(&record, include_structure, version)?)
    }

    /// The version an answer operation works against
    async fn answering_version(&self, id: ChecklistId, version: Option<u32>) -> Result<Version, EngineError> {
        let record = self.store.get(id).await?;
        let selection = self.resolver.select(&record, version)?;
        Ok(selection.version.into_owned())
    }

    /// Empty answers for a version's structure
    ///
    /// # Errors
    /// See [`ChecklistEngine::resolve`]
    pub async fn initial_answers(&self, id: ChecklistId, version: Option<u32>) -> Result<AnswerMap, EngineError> {
        let version = self.answering_version(id, version).await?;
        Ok(build_initial_answers(&version.nodes))
    }

    /// Carry a saved draft over to a version's structure
    ///
    /// # Errors
    /// See [`ChecklistEngine::resolve`]
    pub async fn reconcile_draft(
        &self,
        id: ChecklistId,
        version: Option<u32>,
        draft: &AnswerMap,
    ) -> Result<AnswerMap, EngineError> {
        let version = self.answering_version(id, version).await?;
        Ok(reconcile_answers(&version.nodes, draft))
    }

    /// Check answers without submitting them
    ///
    /// # Errors
    /// See [`ChecklistEngine::resolve`]
    pub async fn validate(
        &self,
        id: ChecklistId,
        version: Option<u32>,
        answers: &AnswerMap,
    ) -> Result<ValidationReport, EngineError> {
        let version = self.answering_version(id, version).await?;
        Ok(validate_answers(&version.nodes, answers))
    }

    /// Validate then collect a submission into a payload
    ///
    /// The payload records the version number and structure hash that were
    /// actually answered.
    ///
    /// # Errors
    /// - [`EngineError::Answers`] when required leaves are unanswered
    /// - store and resolve errors as for [`ChecklistEngine::resolve`]
    pub async fn prepare_evaluation(
        &self,
        id: ChecklistId,
        request: EvaluationRequest,
    ) -> Result<EvaluationPayload, EngineError> {
        let version = self.answering_version(id, request.version).await?;

        let report = validate_answers(&version.nodes, &request.answers);
        if !report.valid {
            tracing::warn!(
                checklist = %id,
                version = version.version,
                missing = %report.summary(self.config.missing_preview),
                "evaluation rejected"
            );
        }
        report.into_result_with_preview(self.config.missing_preview)?;

        let responses = collect_responses_with_notes(&version.nodes, &request.answers, &request.notes);
        let payload = EvaluationPayload {
            checklist_id: id,
            version: version.version,
            structure_hash: version.structure_hash,
            equipment_id: request.equipment_id,
            technician: request.technician,
            responses,
            submitted_at: Utc::now(),
        };
        tracing::info!(
            checklist = %id,
            version = payload.version,
            responses = payload.responses.len(),
            answered = payload.answered(),
            "prepared evaluation"
        );
        Ok(payload)
    }

    /// Edit metadata without creating a version
    ///
    /// # Errors
    /// Returns error if the checklist is missing or deleted
    pub async fn update_metadata(
        &self,
        id: ChecklistId,
        patch: MetadataPatch,
    ) -> Result<ChecklistRecord, EngineError> {
        self.apply(id, RecordChange::Metadata(patch)).await
    }

    /// # Errors
    /// Returns error if the checklist is missing or deleted
    pub async fn set_active(&self, id: ChecklistId, active: bool) -> Result<ChecklistRecord, EngineError> {
        self.apply(id, RecordChange::SetActive(active)).await
    }

    /// Soft-delete; history is kept
    ///
    /// # Errors
    /// Returns error if the checklist is missing or already deleted
    pub async fn delete(&self, id: ChecklistId) -> Result<ChecklistRecord, EngineError> {
        self.apply(id, RecordChange::SoftDelete).await
    }

    /// # Errors
    /// Returns error if the checklist is missing
    pub async fn restore(&self, id: ChecklistId) -> Result<ChecklistRecord, EngineError> {
        self.apply(id, RecordChange::Restore).await
    }

    async fn apply(&self, id: ChecklistId, change: RecordChange) -> Result<ChecklistRecord, EngineError> {
        let label = match &change {
            RecordChange::Metadata(_) => "metadata",
            RecordChange::SetActive(_) => "set_active",
            RecordChange::SoftDelete => "soft_delete",
            RecordChange::Restore => "restore",
        };
        let record = self.store.apply(id, change).await?;
        tracing::info!(checklist = %id, change = label, "updated checklist");
        Ok(record)
    }

    /// Public views (without structure) of the checklists passing `filter`
    ///
    /// # Errors
    /// Returns error if the store cannot be read
    pub async fn list(&self, filter: &ChecklistFilter) -> Result<Vec<ChecklistView>, EngineError> {
        let records = self.store.list(filter).await?;
        records
            .iter()
            .map(|record| self.resolver.resolve(record, false, None).map_err(EngineError::from))
            .collect()
    }
}
