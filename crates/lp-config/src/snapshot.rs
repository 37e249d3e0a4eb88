//! Configuration snapshots for reproducible solve output.
//!
//! A snapshot captures the effective solver configuration at the start of a
//! solve so a policy document can be traced back to the settings that built it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::{ConfigPaths, ConfigSource};
use crate::solver::SolverConfig;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the solver config was loaded from.
    #[serde(default)]
    pub config_path: Option<String>,

    /// Source of the solver configuration.
    pub config_source: String,

    /// SHA-256 hash of the effective configuration serialized as JSON.
    pub config_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub tolerance: f64,
    pub max_expansions: u32,
    pub expansion_rule: String,
    pub seed: u64,
    pub slack: Option<Vec<f64>>,
}

impl ConfigSnapshot {
    /// Create a snapshot of the effective configuration.
    pub fn new(config: &SolverConfig, paths: &ConfigPaths) -> Self {
        Self::with_source(
            config,
            paths.solver.as_ref().map(|p| p.display().to_string()),
            &paths.solver_source,
        )
    }

    /// Create a snapshot for a configuration that did not come from a file.
    pub fn with_source(
        config: &SolverConfig,
        config_path: Option<String>,
        source: &ConfigSource,
    ) -> Self {
        // Serializing a plain struct of numbers and strings cannot fail.
        let canonical = serde_json::to_string(config).unwrap_or_default();
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            config_path,
            config_source: source.to_string(),
            config_hash: hash_content(&canonical),
            summary: ConfigSummary {
                tolerance: config.tolerance,
                max_expansions: config.max_expansions,
                expansion_rule: config.expansion_rule.clone(),
                seed: config.seed,
                slack: config.slack.clone(),
            },
        }
    }

    /// Snapshot of the built-in defaults.
    pub fn defaults_only() -> Self {
        Self::with_source(&SolverConfig::default(), None, &ConfigSource::BuiltinDefault)
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same effective config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_snapshot_is_stable() {
        let a = ConfigSnapshot::defaults_only();
        let b = ConfigSnapshot::defaults_only();
        assert!(a.matches(&b));
        assert_eq!(a.config_hash.len(), 64);
        assert_eq!(a.short_id().len(), 12);
        assert_eq!(a.config_source, "builtin default");
    }

    #[test]
    fn different_config_changes_hash() {
        let a = ConfigSnapshot::defaults_only();
        let b = ConfigSnapshot::with_source(
            &SolverConfig::default().with_seed(42),
            None,
            &ConfigSource::CliArgument,
        );
        assert!(!a.matches(&b));
        assert_eq!(b.summary.seed, 42);
    }

    #[test]
    fn json_roundtrip_preserves_hash() {
        let snap = ConfigSnapshot::defaults_only();
        let json = snap.to_json().unwrap();
        let back = ConfigSnapshot::from_json(&json).unwrap();
        assert!(snap.matches(&back));
        assert_eq!(back.summary, snap.summary);
    }
}
