//! Lexicographic PBVI common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Index newtypes for states, actions, and observations
//! - Run identifiers for log correlation
//! - The workspace error type with stable codes
//! - Output format specifications

pub mod error;
pub mod id;
pub mod output;

pub use error::{Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use id::{ActionId, ObservationId, RunId, StateId};
pub use output::OutputFormat;

/// Schema version for documents emitted by the solver (policies, reports).
pub const SCHEMA_VERSION: &str = "1.0.0";
