//! Engine error type

use crate::config::ConfigError;
use inspecta_answers::AnswerError;
use inspecta_schema::NormalizeError;
use inspecta_store::{ResolveError, StoreError};

/// Any failure surfaced by [`crate::ChecklistEngine`]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Authoring input rejected
    #[error("invalid structure: {0}")]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Submitted answers incomplete
    #[error(transparent)]
    Answers(#[from] AnswerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Only a lost optimistic-concurrency race is worth repeating
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_retryable())
    }

    /// Titles of unanswered required leaves, when the error is about
    /// incomplete answers
    #[must_use]
    pub fn missing_fields(&self) -> Option<&[String]> {
        match self {
            Self::Answers(err) => Some(err.missing()),
            _ => None,
        }
    }
}
