//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::solver::{ExpansionRule, SolverConfig};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a solver configuration semantically.
///
/// Checks everything that can be checked without a model. Slack length
/// against the objective count is checked by [`validate_slack_for`] once the
/// model is known.
pub fn validate_solver_config(config: &SolverConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(ValidationError::invalid(
            "tolerance",
            format!("must be a positive finite number, got {}", config.tolerance),
        ));
    }

    if config.max_expansions == 0 {
        return Err(ValidationError::invalid(
            "max_expansions",
            "must be at least 1 (one round always runs)",
        ));
    }

    if let Some(slack) = &config.slack {
        validate_slack_values(slack)?;
    }

    config.expansion_rule.parse::<ExpansionRule>()?;

    if let Some(cap) = config.max_belief_points {
        if cap == 0 {
            return Err(ValidationError::invalid(
                "max_belief_points",
                "must be at least 1 when set",
            ));
        }
    }

    Ok(())
}

/// Check a slack vector against the number of objectives in a model.
pub fn validate_slack_for(slack: &[f64], objectives: usize) -> ValidationResult<()> {
    if slack.len() != objectives {
        return Err(ValidationError::invalid(
            "slack",
            format!(
                "expected one entry per objective ({}), got {}",
                objectives,
                slack.len()
            ),
        ));
    }
    validate_slack_values(slack)
}

fn validate_slack_values(slack: &[f64]) -> ValidationResult<()> {
    for (i, delta) in slack.iter().enumerate() {
        if !(delta.is_finite() && *delta >= 0.0) {
            return Err(ValidationError::invalid(
                "slack",
                format!("entry {} must be non-negative and finite, got {}", i, delta),
            ));
        }
    }
    Ok(())
}
