//! Lexicographic point-based value iteration.
//!
//! This library provides:
//! - The typed finite POMDP model and its JSON document form
//! - Belief states, Bayesian updates and the belief point set
//! - The L-PBVI solver with its caches and calibrator
//! - Belief expansion strategies
//! - Policy output documents, JSON schemas and structured logging
//!
//! The binary entry point is in `main.rs`.

pub mod belief;
pub mod config;
pub mod exit_codes;
pub mod expansion;
pub mod logging;
pub mod model;
pub mod output;
pub mod schema;
pub mod solver;

#[cfg(test)]
pub(crate) mod test_models;

pub use belief::{BeliefPointSet, BeliefState};
pub use model::{LexPomdp, ModelDocument, ModelError};
pub use solver::{LexicographicPolicy, LpbviSolver, SolveError, ValueFunction};

use std::path::Path;

/// A model loaded from disk with the SHA-256 of its source bytes.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: LexPomdp,
    pub fingerprint: String,
}

/// Read, parse and shape-check a model file.
pub fn load_model(path: &Path) -> Result<LoadedModel, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|e| ModelError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let doc = ModelDocument::from_json(&content)?;
    let model = LexPomdp::from_document(&doc)?;
    Ok(LoadedModel {
        model,
        fingerprint: output::fingerprint(content.as_bytes()),
    })
}
