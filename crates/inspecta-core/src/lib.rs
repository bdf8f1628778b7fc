//! Inspecta Core
//!
//! The engine behind versioned inspection checklists.
//!
//! # Core Concepts
//!
//! - [`ChecklistEngine`]: lifecycle, publishing and evaluation preparation
//!   over any [`inspecta_store::ChecklistStore`]
//! - [`EngineConfig`]: depth limit and key/version policies, from TOML or YAML
//! - [`EvaluationPayload`]: responses bound to the version they answered
//!
//! # Example
//!
//! ```rust
//! use inspecta_core::{ChecklistEngine, EngineConfig, EvaluationRequest};
//! use inspecta_answers::AnswerMap;
//! use inspecta_schema::RawNode;
//! use inspecta_store::{ChecklistDraft, VersionMeta};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = ChecklistEngine::in_memory(EngineConfig::default());
//! let raw = vec![RawNode::titled("Estado").with_input_type("select").required()];
//! let record = engine
//!     .create_checklist(ChecklistDraft::new("Camión", "truck"), VersionMeta::new("v1", "ana"), &raw)
//!     .await
//!     .unwrap();
//!
//! let request = EvaluationRequest::new("EQ-1", "ana")
//!     .with_answers(AnswerMap::new().with("estado", "cumple"));
//! let payload = engine.prepare_evaluation(record.id, request).await.unwrap();
//! assert_eq!(payload.version, 1);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod engine;
mod error;
mod evaluation;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig};
pub use engine::ChecklistEngine;
pub use error::EngineError;
pub use evaluation::{EvaluationPayload, EvaluationRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
