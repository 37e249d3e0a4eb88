//! Error types for the lexicographic PBVI workspace.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification matching the solver's failure taxonomy
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! Engine-level errors (model shape, solver preconditions) live next to the
//! code that raises them and convert into [`Error`] at the CLI boundary.
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 22,
//!   "category": "config",
//!   "message": "invalid slack vector: expected 2 entries, got 3",
//!   "recoverable": true,
//!   "suggested_action": "fix_config"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A model component is absent or malformed.
    Model,
    /// Solver configuration is malformed or unsupported.
    Config,
    /// Failure while running the solver itself.
    Solve,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Model => write!(f, "model"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Solve => write!(f, "solve"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for agents to take in response to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Correct the model document.
    FixModel,
    /// Correct the solver configuration.
    FixConfig,
    /// Run the `check` command for a detailed report.
    RunCheck,
    /// Retry the operation.
    Retry,
    /// Report as a bug.
    ReportBug,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixModel => write!(f, "fix_model"),
            SuggestedAction::FixConfig => write!(f, "fix_config"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ReportBug => write!(f, "report_bug"),
        }
    }
}

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum Error {
    // Model errors (10-19)
    #[error("model error: {0}")]
    Model(String),

    #[error("missing model component: {0}")]
    MissingComponent(String),

    #[error("malformed reward model: {0}")]
    MalformedRewards(String),

    // Configuration errors (20-29)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported horizon: {0}")]
    UnsupportedHorizon(String),

    #[error("invalid slack vector: {0}")]
    InvalidSlack(String),

    #[error("unknown expansion rule: {0}")]
    UnknownExpansionRule(String),

    // Solve errors (30-39)
    #[error("solver failure: {0}")]
    Solve(String),

    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Model errors
    /// - 20-29: Configuration errors
    /// - 30-39: Solve errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Model(_) => 10,
            Error::MissingComponent(_) => 11,
            Error::MalformedRewards(_) => 12,
            Error::Config(_) => 20,
            Error::UnsupportedHorizon(_) => 21,
            Error::InvalidSlack(_) => 22,
            Error::UnknownExpansionRule(_) => 23,
            Error::Solve(_) => 30,
            Error::NumericalInstability(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Model(_) | Error::MissingComponent(_) | Error::MalformedRewards(_) => {
                ErrorCategory::Model
            }

            Error::Config(_)
            | Error::UnsupportedHorizon(_)
            | Error::InvalidSlack(_)
            | Error::UnknownExpansionRule(_) => ErrorCategory::Config,

            Error::Solve(_) | Error::NumericalInstability(_) => ErrorCategory::Solve,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Model and configuration errors are recoverable only by changing the
    /// input; the solver never retries them on its own.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Model(_) | Error::MissingComponent(_) | Error::MalformedRewards(_) => true,
            Error::Config(_)
            | Error::UnsupportedHorizon(_)
            | Error::InvalidSlack(_)
            | Error::UnknownExpansionRule(_) => true,
            Error::Solve(_) => false,
            Error::NumericalInstability(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns the suggested action for agents.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Model(_) | Error::MissingComponent(_) | Error::MalformedRewards(_) => {
                SuggestedAction::FixModel
            }
            Error::Config(_)
            | Error::UnsupportedHorizon(_)
            | Error::InvalidSlack(_)
            | Error::UnknownExpansionRule(_) => SuggestedAction::FixConfig,
            Error::Solve(_) | Error::NumericalInstability(_) => SuggestedAction::ReportBug,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::RunCheck,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Model(_) => "Run 'lp-core check --model <file>' for a detailed model report.",
            Error::MissingComponent(_) => {
                "Add the missing section to the model document. See 'lp-core schema ModelDocument'."
            }
            Error::MalformedRewards(_) => {
                "Rewards must be a list of objectives, each with finite state-action entries."
            }
            Error::Config(_) => "Run 'lp-core config validate' to check the solver configuration.",
            Error::UnsupportedHorizon(_) => {
                "Remove 'steps' from the model horizon; only infinite-horizon discounting is supported."
            }
            Error::InvalidSlack(_) => {
                "Provide exactly one non-negative slack value per objective (e.g. '--slack 0.0,0.5')."
            }
            Error::UnknownExpansionRule(_) => {
                "Use one of: none, random, ssra, ssea, ger. See 'lp-core config presets'."
            }
            Error::Solve(_) => "Internal solver failure. Re-run with -vv and report the log.",
            Error::NumericalInstability(_) => {
                "Rewards or probabilities produced non-finite values. Check for extreme magnitudes."
            }
            Error::Io(_) => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Model(_) => "Model Error",
            Error::MissingComponent(_) => "Missing Model Component",
            Error::MalformedRewards(_) => "Malformed Reward Model",
            Error::Config(_) => "Configuration Error",
            Error::UnsupportedHorizon(_) => "Unsupported Horizon",
            Error::InvalidSlack(_) => "Invalid Slack Vector",
            Error::UnknownExpansionRule(_) => "Unknown Expansion Rule",
            Error::Solve(_) => "Solver Failure",
            Error::NumericalInstability(_) => "Numerical Instability",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for agents.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., file path, objective index).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context: HashMap::new(),
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_errors() -> Vec<Error> {
        vec![
            Error::Model("m".into()),
            Error::MissingComponent("states".into()),
            Error::MalformedRewards("r".into()),
            Error::Config("c".into()),
            Error::UnsupportedHorizon("finite".into()),
            Error::InvalidSlack("len".into()),
            Error::UnknownExpansionRule("x".into()),
            Error::Solve("s".into()),
            Error::NumericalInstability("nan".into()),
            Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
            Error::Json(serde_json::from_str::<serde_json::Value>("{").unwrap_err()),
        ]
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<u32> = all_errors().iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn codes_match_categories() {
        for err in all_errors() {
            let code = err.code();
            let expected = match code {
                10..=19 => ErrorCategory::Model,
                20..=29 => ErrorCategory::Config,
                30..=39 => ErrorCategory::Solve,
                _ => ErrorCategory::Io,
            };
            assert_eq!(err.category(), expected, "code {code}");
        }
    }

    #[test]
    fn structured_error_serializes() {
        let err = Error::InvalidSlack("expected 2 entries, got 3".into());
        let structured = StructuredError::from(&err).with_context("objectives", 2);
        let json = structured.to_json();
        assert!(json.contains(r#""code":22"#));
        assert!(json.contains(r#""category":"config""#));
        assert!(json.contains(r#""suggested_action":"fix_config""#));
        assert!(json.contains(r#""objectives":2"#));
    }

    #[test]
    fn headlines_and_remediations_non_empty() {
        for err in all_errors() {
            assert!(!err.headline().is_empty());
            assert!(!err.remediation().is_empty());
        }
    }

    #[test]
    fn solver_failures_are_not_recoverable() {
        assert!(!Error::Solve("x".into()).is_recoverable());
        assert!(Error::InvalidSlack("x".into()).is_recoverable());
    }
}
