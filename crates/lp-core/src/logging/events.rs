//! Event vocabulary for the solver's logs.
//!
//! Every event is emitted with one of the [`event_names`] as its tracing
//! target and a [`Stage`] naming the part of the pipeline that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Stages of a solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and logging setup.
    Init,
    /// Reading the model document and solver configuration.
    Load,
    /// Model shape and configuration precondition checks.
    Validate,
    /// Iteration count calibration.
    Calibrate,
    /// Value iteration over the belief point set.
    Solve,
    /// Belief point set expansion.
    Expand,
    /// Policy document rendering.
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Validate => "validate",
            Stage::Calibrate => "calibrate",
            Stage::Solve => "solve",
            Stage::Expand => "expand",
            Stage::Output => "output",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Load / validate
    pub const MODEL_LOADED: &str = "model.loaded";
    pub const MODEL_REJECTED: &str = "model.rejected";
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Calibrate
    pub const CALIBRATE_FINISHED: &str = "calibrate.finished";

    // Solve
    pub const SOLVE_STARTED: &str = "solve.started";
    pub const SOLVE_ROUND_STARTED: &str = "solve.round_started";
    pub const SOLVE_OBJECTIVE_SOLVED: &str = "solve.objective_solved";
    pub const SOLVE_SWEEP_FINISHED: &str = "solve.sweep_finished";
    pub const SOLVE_BACKUP_WINNER: &str = "solve.backup_winner";
    pub const SOLVE_FINISHED: &str = "solve.finished";

    // Expand
    pub const EXPAND_FINISHED: &str = "expand.finished";
    pub const EXPAND_STOPPED: &str = "expand.stopped";

    // Output
    pub const OUTPUT_WRITTEN: &str = "output.written";

    // Error events
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// One JSONL log line.
///
/// Built by [`JsonlLayer`](super::JsonlLayer) from a tracing event and its
/// enclosing spans. Correlation fields are lifted to the top level; anything
/// else the event recorded lands in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,

    pub level: Level,

    /// Event name from [`event_names`], carried as the tracing target.
    pub event: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Expansion round, from the solver's `round` span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u64>,

    /// Objective priority index, from the solver's `objective` span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl LogEvent {
    pub fn new(level: Level, event: impl Into<String>) -> Self {
        LogEvent {
            ts: Utc::now(),
            level,
            event: event.into(),
            run_id: None,
            model: None,
            stage: None,
            round: None,
            objective: None,
            message: None,
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.event
            )
        })
    }
}

/// Correlation fields shared by every event of one CLI invocation.
///
/// Passed to [`log_event!`](crate::log_event), which stamps `run_id` and
/// `model` onto the emitted event.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    /// Set once the model document is loaded.
    pub model: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
