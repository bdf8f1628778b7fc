//! Evaluation payloads
//!
//! An evaluation binds a technician's responses to the exact structure
//! version they answered, so later edits to the checklist cannot change what
//! a submitted evaluation means.

use chrono::{DateTime, Utc};
use inspecta_answers::{AnswerMap, ItemNotes, ResponseEntry};
use inspecta_store::{ChecklistId, StructureHash};
use serde::{Deserialize, Serialize};

/// What a technician submits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    /// Version the form was rendered from; latest when absent
    #[serde(default)]
    pub version: Option<u32>,
    pub equipment_id: String,
    pub technician: String,
    #[serde(default)]
    pub answers: AnswerMap,
    #[serde(default)]
    pub notes: ItemNotes,
}

impl EvaluationRequest {
    #[must_use]
    pub fn new(equipment_id: impl Into<String>, technician: impl Into<String>) -> Self {
        Self {
            equipment_id: equipment_id.into(),
            technician: technician.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_answers(mut self, answers: AnswerMap) -> Self {
        self.answers = answers;
        self
    }

    #[must_use]
    pub fn with_note(mut self, key: impl Into<String>, note: impl Into<String>) -> Self {
        self.notes.insert(key.into(), note.into());
        self
    }
}

/// Validated submission ready to hand to persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPayload {
    pub checklist_id: ChecklistId,
    pub version: u32,
    pub structure_hash: StructureHash,
    pub equipment_id: String,
    pub technician: String,
    pub responses: Vec<ResponseEntry>,
    pub submitted_at: DateTime<Utc>,
}

impl EvaluationPayload {
    /// Responses carrying a usable answer
    #[must_use]
    pub fn answered(&self) -> usize {
        self.responses.iter().filter(|r| r.is_answered()).count()
    }
}
