//! Solver configuration types.
//!
//! These types match the `solver.json` file format:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "tolerance": 0.01,
//!   "slack": [0.0, 0.5],
//!   "max_expansions": 4,
//!   "expansion_rule": "ssea",
//!   "seed": 7
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validate::ValidationError;

/// Complete solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Target approximation error ε used by the iteration calibrator.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// One non-negative slack per objective. `None` means zero slack for
    /// every objective of whatever model is solved.
    #[serde(default)]
    pub slack: Option<Vec<f64>>,

    /// Upper bound on expansion rounds.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u32,

    /// Name of the belief-expansion heuristic; see [`ExpansionRule`].
    #[serde(default = "default_expansion_rule")]
    pub expansion_rule: String,

    /// Seed for the expansion heuristics' random number generator.
    #[serde(default)]
    pub seed: u64,

    /// Optional cap on the belief point set size.
    #[serde(default)]
    pub max_belief_points: Option<usize>,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_tolerance() -> f64 {
    0.01
}

fn default_max_expansions() -> u32 {
    1
}

fn default_expansion_rule() -> String {
    ExpansionRule::None.as_str().to_string()
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            schema_version: default_schema_version(),
            description: None,
            tolerance: default_tolerance(),
            slack: None,
            max_expansions: default_max_expansions(),
            expansion_rule: default_expansion_rule(),
            seed: 0,
            max_belief_points: None,
        }
    }
}

impl SolverConfig {
    /// Load a solver configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse a solver configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Slack vector for a model with `objectives` objectives.
    ///
    /// An explicit vector is returned unchanged (its length is checked by the
    /// solver); an absent one expands to all zeros.
    pub fn slack_for(&self, objectives: usize) -> Vec<f64> {
        match &self.slack {
            Some(slack) => slack.clone(),
            None => vec![0.0; objectives],
        }
    }

    /// Resolve the configured expansion rule name.
    pub fn expansion_rule(&self) -> Result<ExpansionRule, ValidationError> {
        self.expansion_rule.parse()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_slack(mut self, slack: Vec<f64>) -> Self {
        self.slack = Some(slack);
        self
    }

    pub fn with_max_expansions(mut self, rounds: u32) -> Self {
        self.max_expansions = rounds;
        self
    }

    pub fn with_expansion_rule(mut self, rule: impl Into<String>) -> Self {
        self.expansion_rule = rule.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_belief_points(mut self, cap: usize) -> Self {
        self.max_belief_points = Some(cap);
        self
    }
}

/// Belief-expansion heuristic selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionRule {
    /// Do not expand; the solve ends after one round.
    None,
    /// Add beliefs drawn uniformly from the simplex.
    RandomBeliefSelection,
    /// One-step simulation with a random action.
    StochasticSimulationRandomAction,
    /// One-step simulation of every action, keeping the most novel successor.
    StochasticSimulationExploratoryAction,
    /// Add the successor with the largest estimated approximation error.
    GreedyErrorReduction,
}

impl ExpansionRule {
    pub const ALL: &'static [ExpansionRule] = &[
        ExpansionRule::None,
        ExpansionRule::RandomBeliefSelection,
        ExpansionRule::StochasticSimulationRandomAction,
        ExpansionRule::StochasticSimulationExploratoryAction,
        ExpansionRule::GreedyErrorReduction,
    ];

    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpansionRule::None => "none",
            ExpansionRule::RandomBeliefSelection => "random_belief_selection",
            ExpansionRule::StochasticSimulationRandomAction => {
                "stochastic_simulation_random_action"
            }
            ExpansionRule::StochasticSimulationExploratoryAction => {
                "stochastic_simulation_exploratory_action"
            }
            ExpansionRule::GreedyErrorReduction => "greedy_error_reduction",
        }
    }

    /// Short alias accepted on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            ExpansionRule::None => "none",
            ExpansionRule::RandomBeliefSelection => "random",
            ExpansionRule::StochasticSimulationRandomAction => "ssra",
            ExpansionRule::StochasticSimulationExploratoryAction => "ssea",
            ExpansionRule::GreedyErrorReduction => "ger",
        }
    }

    /// Parse a rule from its canonical name or alias.
    pub fn parse(s: &str) -> Option<ExpansionRule> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "none" | "noop" | "no_op" => Some(ExpansionRule::None),
            "random_belief_selection" | "random" | "ra" => {
                Some(ExpansionRule::RandomBeliefSelection)
            }
            "stochastic_simulation_random_action" | "ssra" => {
                Some(ExpansionRule::StochasticSimulationRandomAction)
            }
            "stochastic_simulation_exploratory_action" | "ssea" => {
                Some(ExpansionRule::StochasticSimulationExploratoryAction)
            }
            "greedy_error_reduction" | "ger" => Some(ExpansionRule::GreedyErrorReduction),
            _ => None,
        }
    }

    /// True when the rule never adds belief points.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExpansionRule::None)
    }
}

impl fmt::Display for ExpansionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExpansionRule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpansionRule::parse(s).ok_or_else(|| ValidationError::InvalidValue {
            field: "expansion_rule".to_string(),
            message: format!(
                "unknown rule '{}'. Available: {}",
                s,
                ExpansionRule::ALL
                    .iter()
                    .map(|r| r.short_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_single_round_no_expansion() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.max_expansions, 1);
        assert_eq!(config.expansion_rule().unwrap(), ExpansionRule::None);
        assert!(config.slack.is_none());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = SolverConfig::parse_json("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn parse_json_reads_fields() {
        let config = SolverConfig::parse_json(
            r#"{"tolerance": 0.5, "slack": [0.0, 1.0], "max_expansions": 3,
                "expansion_rule": "ssea", "seed": 9}"#,
        )
        .unwrap();
        assert_eq!(config.tolerance, 0.5);
        assert_eq!(config.slack, Some(vec![0.0, 1.0]));
        assert_eq!(config.max_expansions, 3);
        assert_eq!(
            config.expansion_rule().unwrap(),
            ExpansionRule::StochasticSimulationExploratoryAction
        );
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn parse_json_rejects_garbage() {
        assert!(matches!(
            SolverConfig::parse_json("not json"),
            Err(ValidationError::ParseError(_))
        ));
    }

    #[test]
    fn slack_for_expands_missing_vector() {
        assert_eq!(SolverConfig::default().slack_for(3), vec![0.0; 3]);
        let explicit = SolverConfig::default().with_slack(vec![1.0]);
        assert_eq!(explicit.slack_for(3), vec![1.0]);
    }

    #[test]
    fn rule_names_roundtrip() {
        for rule in ExpansionRule::ALL {
            assert_eq!(ExpansionRule::parse(rule.as_str()), Some(*rule));
            assert_eq!(ExpansionRule::parse(rule.short_name()), Some(*rule));
        }
        assert_eq!(
            ExpansionRule::parse("Greedy-Error-Reduction"),
            Some(ExpansionRule::GreedyErrorReduction)
        );
    }

    #[test]
    fn unknown_rule_is_invalid_value() {
        let err = "sideways".parse::<ExpansionRule>().unwrap_err();
        match err {
            ValidationError::InvalidValue { field, message } => {
                assert_eq!(field, "expansion_rule");
                assert!(message.contains("ssea"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_none_is_terminal() {
        for rule in ExpansionRule::ALL {
            assert_eq!(rule.is_terminal(), *rule == ExpansionRule::None);
        }
    }
}
