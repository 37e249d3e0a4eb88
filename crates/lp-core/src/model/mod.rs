//! Finite lexicographic POMDP model.
//!
//! A [`ModelDocument`] is what the user writes; a [`LexPomdp`] is what the
//! solver consumes. [`LexPomdp::from_document`] is the only place model
//! shape is checked: everything downstream indexes the typed tables freely.

pub mod document;
pub mod finite;
pub mod horizon;
pub mod rewards;

pub use document::{
    HorizonSpec, ModelDocument, ObjectiveRewards, ObservationEntry, RewardEntry, RewardsSpec,
    TransitionEntry,
};
pub use finite::LexPomdp;
pub use horizon::Horizon;
pub use rewards::ObjectiveReward;

use crate::belief::BeliefStateError;
use thiserror::Error;

/// Model-shape errors raised while building a [`LexPomdp`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("failed to read model {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid model JSON: {0}")]
    Parse(String),

    #[error("model has no {0}")]
    MissingComponent(&'static str),

    #[error("{0} list is empty")]
    EmptySpace(&'static str),

    #[error("duplicate {space} name '{name}'")]
    DuplicateName { space: &'static str, name: String },

    #[error("unknown {space} '{name}' referenced in {context}")]
    UnknownName {
        space: &'static str,
        name: String,
        context: &'static str,
    },

    #[error("{context} probability {value} is outside [0, 1]")]
    InvalidProbability { context: String, value: f64 },

    #[error("{context} appears more than once")]
    DuplicateEntry { context: String },

    #[error("{context} sums to {sum}, expected 1")]
    RowNotNormalized { context: String, sum: f64 },

    #[error("malformed reward model: {0}")]
    MalformedRewards(String),

    #[error("discount {0} is outside (0, 1)")]
    InvalidDiscount(f64),

    #[error("initial belief {index}: {source}")]
    InvalidBelief {
        index: usize,
        #[source]
        source: BeliefStateError,
    },
}

impl ModelError {
    /// Stable error code shared with `lp_common::Error`.
    pub fn code(&self) -> u32 {
        match self {
            ModelError::Read { .. } => 60,
            ModelError::MissingComponent(_) => 11,
            ModelError::MalformedRewards(_) => 12,
            _ => 10,
        }
    }
}

impl From<ModelError> for lp_common::Error {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MissingComponent(what) => lp_common::Error::MissingComponent(what.into()),
            ModelError::MalformedRewards(msg) => lp_common::Error::MalformedRewards(msg),
            read @ ModelError::Read { .. } => {
                lp_common::Error::Io(std::io::Error::other(read.to_string()))
            }
            other => lp_common::Error::Model(other.to_string()),
        }
    }
}

/// Result type for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lp_common::ErrorCategory;

    #[test]
    fn codes_line_up_with_workspace_errors() {
        let cases = [
            ModelError::MissingComponent("transitions"),
            ModelError::MalformedRewards("not factored".into()),
            ModelError::EmptySpace("states"),
        ];
        for err in cases {
            let code = err.code();
            let converted: lp_common::Error = err.into();
            assert_eq!(converted.code(), code);
            assert_eq!(converted.category(), ErrorCategory::Model);
        }
    }

    #[test]
    fn unreadable_file_is_io() {
        let err = ModelError::Read {
            path: "/missing.json".into(),
            message: "not found".into(),
        };
        assert_eq!(err.code(), 60);
        let converted: lp_common::Error = err.into();
        assert_eq!(converted.category(), ErrorCategory::Io);
    }
}
