//! Solver errors.

use lp_common::ErrorCategory;
use thiserror::Error;

use crate::expansion::ExpansionError;
use crate::model::Horizon;

/// Errors raised by [`LpbviSolver`](super::LpbviSolver).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("unsupported horizon {0}: only infinite-horizon discounted models are solvable")]
    FiniteHorizon(Horizon),

    #[error("slack has {actual} entries but the model has {expected} objectives")]
    SlackLength { expected: usize, actual: usize },

    #[error("slack entry {index} is {value}; entries must be finite and non-negative")]
    InvalidSlack { index: usize, value: f64 },

    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),

    #[error("max_expansions must be at least 1")]
    NoRounds,

    #[error("unknown expansion rule '{0}'")]
    UnknownExpansionRule(String),

    #[error("model has no actions")]
    EmptyActionSet,

    #[error("non-finite value at belief point {point} for objective {objective}")]
    NonFinite { objective: usize, point: usize },

    #[error("belief expansion failed: {0}")]
    Expansion(#[from] ExpansionError),
}

impl SolveError {
    /// Stable error code shared with `lp_common::Error`.
    pub fn code(&self) -> u32 {
        match self {
            SolveError::FiniteHorizon(_) => 21,
            SolveError::SlackLength { .. } | SolveError::InvalidSlack { .. } => 22,
            SolveError::UnknownExpansionRule(_) => 23,
            SolveError::InvalidTolerance(_) | SolveError::NoRounds => 20,
            SolveError::NonFinite { .. } => 31,
            SolveError::EmptyActionSet | SolveError::Expansion(_) => 30,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            20..=29 => ErrorCategory::Config,
            _ => ErrorCategory::Solve,
        }
    }
}

impl From<SolveError> for lp_common::Error {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::FiniteHorizon(h) => lp_common::Error::UnsupportedHorizon(h.to_string()),
            SolveError::UnknownExpansionRule(rule) => lp_common::Error::UnknownExpansionRule(rule),
            SolveError::NonFinite { .. } => {
                lp_common::Error::NumericalInstability(err.to_string())
            }
            e @ (SolveError::SlackLength { .. } | SolveError::InvalidSlack { .. }) => {
                lp_common::Error::InvalidSlack(e.to_string())
            }
            e @ (SolveError::InvalidTolerance(_) | SolveError::NoRounds) => {
                lp_common::Error::Config(e.to_string())
            }
            e @ (SolveError::EmptyActionSet | SolveError::Expansion(_)) => {
                lp_common::Error::Solve(e.to_string())
            }
        }
    }
}
