//! Serialized model document.
//!
//! Every top-level component is optional at the serde level so that an
//! absent component surfaces as [`ModelError::MissingComponent`] from
//! [`LexPomdp::from_document`](super::LexPomdp::from_document) instead of a
//! generic parse failure.
//!
//! ```json
//! {
//!   "name": "two-state",
//!   "states": ["good", "bad"],
//!   "actions": ["stay", "move"],
//!   "observations": ["ping"],
//!   "transitions": [
//!     {"state": "good", "action": "stay", "successor": "good", "probability": 1.0}
//!   ],
//!   "observation_model": [
//!     {"action": "stay", "successor": "good", "observation": "ping", "probability": 1.0}
//!   ],
//!   "rewards": [
//!     {"name": "safety", "entries": [{"state": "good", "action": "stay", "reward": 1.0}]}
//!   ],
//!   "horizon": {"discount": 0.95},
//!   "initial_beliefs": [{"good": 0.5, "bad": 0.5}]
//! }
//! ```
//!
//! [`ModelError::MissingComponent`]: super::ModelError::MissingComponent

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ModelError, Result};

/// A lexicographic POMDP as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub states: Option<Vec<String>>,

    #[serde(default)]
    pub actions: Option<Vec<String>>,

    #[serde(default)]
    pub observations: Option<Vec<String>>,

    /// Sparse `P(successor | state, action)` entries.
    #[serde(default)]
    pub transitions: Option<Vec<TransitionEntry>>,

    /// Sparse `P(observation | successor, action)` entries.
    #[serde(default)]
    pub observation_model: Option<Vec<ObservationEntry>>,

    /// One reward table per objective, highest priority first.
    #[serde(default)]
    pub rewards: Option<RewardsSpec>,

    #[serde(default)]
    pub horizon: Option<HorizonSpec>,

    /// Seed belief points, each a map from state name to probability.
    #[serde(default)]
    pub initial_beliefs: Option<Vec<BTreeMap<String, f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransitionEntry {
    pub state: String,
    pub action: String,
    pub successor: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObservationEntry {
    pub action: String,
    pub successor: String,
    pub observation: String,
    pub probability: f64,
}

/// Reward specification.
///
/// Only the factored form is solvable. A bare list of entries is accepted
/// by the parser and rejected at the typed boundary as a non-factored model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RewardsSpec {
    Factored(Vec<ObjectiveRewards>),
    Scalar(Vec<RewardEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectiveRewards {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<RewardEntry>,
}

/// One `r(state, action)` entry. Pairs without an entry earn zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RewardEntry {
    pub state: String,
    pub action: String,
    /// Present only for successor-dependent rewards, which are not supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<String>,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HorizonSpec {
    pub discount: f64,
    /// Number of decision steps; absent for an infinite horizon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl ModelDocument {
    /// Parse a model document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))
    }

    /// Read and parse a model document from a file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}
