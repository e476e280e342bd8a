//! Core types shared across the lazy item evaluation facilities
//!
//! This crate provides foundational types used by the evaluator, the error
//! facility and the logging facility:
//!
//! - **Correlation types**: EvaluationId, DocumentId
//! - **Source locations**: ElementLocation for diagnostics
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod location;
pub mod schema;

pub use correlation::{DocumentId, EvaluationId};
pub use location::ElementLocation;
