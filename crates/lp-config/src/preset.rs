//! Solver presets for common accuracy/effort trade-offs.
//!
//! - Quick: coarse tolerance, a single round, no expansion
//! - Balanced: moderate tolerance, a few exploratory expansion rounds
//! - Thorough: tight tolerance, many error-driven expansion rounds

use crate::solver::{ExpansionRule, SolverConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available solver presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// Coarse tolerance, one round over the initial belief points
    Quick,
    /// Moderate tolerance with exploratory simulation
    Balanced,
    /// Tight tolerance with greedy error reduction
    Thorough,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] =
        &[PresetName::Quick, PresetName::Balanced, PresetName::Thorough];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Quick => "quick",
            PresetName::Balanced => "balanced",
            PresetName::Thorough => "thorough",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "quick" | "fast" => Some(PresetName::Quick),
            "balanced" | "default" => Some(PresetName::Balanced),
            "thorough" | "precise" | "slow" => Some(PresetName::Thorough),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Quick => "Tolerance 0.1, single round, no belief expansion",
            PresetName::Balanced => "Tolerance 0.01, up to 4 rounds of exploratory expansion",
            PresetName::Thorough => "Tolerance 0.001, up to 8 rounds of greedy error reduction",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone)]
pub enum PresetError {
    /// Unknown preset name.
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Build the solver configuration for a preset.
pub fn get_preset(name: PresetName) -> SolverConfig {
    let (tolerance, rounds, rule) = match name {
        PresetName::Quick => (0.1, 1, ExpansionRule::None),
        PresetName::Balanced => (0.01, 4, ExpansionRule::StochasticSimulationExploratoryAction),
        PresetName::Thorough => (0.001, 8, ExpansionRule::GreedyErrorReduction),
    };
    let mut config = SolverConfig::default()
        .with_tolerance(tolerance)
        .with_max_expansions(rounds)
        .with_expansion_rule(rule.as_str());
    config.description = Some(format!("{} preset: {}", name, name.description()));
    config
}
