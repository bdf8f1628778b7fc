//! Inspecta Answers
//!
//! Everything that happens between a resolved checklist structure and a
//! submitted evaluation: the empty answer skeleton a form binds to, the
//! required-field check, and the flat response list.
//!
//! # Core Concepts
//!
//! - [`AnswerMap`]: answers keyed by node key
//! - [`build_initial_answers`]: skeleton with one empty value per leaf
//! - [`validate_answers`]: titles of required leaves without a usable answer
//! - [`collect_responses`]: ordered `{itemKey, value}` list for submission
//!
//! All three walk the tree in the same pre-order, so missing fields and
//! responses line up with what the technician sees.
//!
//! # Example
//!
//! ```rust
//! use inspecta_answers::{build_initial_answers, collect_responses, validate_answers};
//! use inspecta_schema::{normalize, RawNode};
//!
//! let nodes = normalize(&[RawNode::titled("Estado").with_input_type("select").required()]).unwrap();
//! let mut answers = build_initial_answers(&nodes);
//! assert!(!validate_answers(&nodes, &answers).valid);
//!
//! answers.insert("estado", "cumple");
//! assert!(validate_answers(&nodes, &answers).valid);
//! assert_eq!(collect_responses(&nodes, &answers).len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod collect;
mod error;
mod skeleton;
mod validate;
mod value;

pub use collect::{collect_responses, collect_responses_with_notes, ItemNotes, ResponseEntry};
pub use error::{preview, AnswerError, MISSING_PREVIEW};
pub use skeleton::{build_initial_answers, default_answer, reconcile_answers};
pub use validate::{validate_answers, ValidationReport};
pub use value::{AnswerMap, AnswerValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
