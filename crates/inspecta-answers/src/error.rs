//! Answer validation errors

use thiserror::Error;

/// Default number of missing fields an error message lists before eliding
pub const MISSING_PREVIEW: usize = 3;

/// Answer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    /// Titles of required leaves left unanswered, in traversal order
    #[error("missing required fields: {}", preview(.missing, *.limit))]
    MissingRequiredFields {
        missing: Vec<String>,
        /// Titles shown in the message before `...`
        limit: usize,
    },
}

impl AnswerError {
    /// Titles of the unanswered leaves
    #[must_use]
    pub fn missing(&self) -> &[String] {
        match self {
            Self::MissingRequiredFields { missing, .. } => missing,
        }
    }
}

/// First `limit` entries joined by `, `, then `...` when more remain
#[must_use]
pub fn preview(missing: &[String], limit: usize) -> String {
    let shown = missing.iter().take(limit).map(String::as_str).collect::<Vec<_>>().join(", ");
    if missing.len() > limit {
        format!("{shown}...")
    } else {
        shown
    }
}
