//! Solve output documents.
//!
//! [`PolicyDocument`] is the serialized form of a [`LexicographicPolicy`]:
//! value functions with action names, the belief points they were solved on,
//! run statistics and fingerprints of the inputs. It renders as JSON (the
//! machine format), Markdown, or a one-line summary.

use lp_common::{OutputFormat, SCHEMA_VERSION};
use lp_config::ConfigSnapshot;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

use crate::model::LexPomdp;
use crate::solver::{LexicographicPolicy, SolveStats};

/// SHA-256 of raw input bytes, hex encoded.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub states: Vec<String>,
    pub actions: Vec<String>,
    pub observations: usize,
    pub discount: f64,
    /// SHA-256 of the model file.
    pub fingerprint: String,
}

impl ModelSummary {
    pub fn from_model(model: &LexPomdp, fingerprint: String) -> Self {
        ModelSummary {
            name: model.name().map(str::to_string),
            states: (0..model.num_states())
                .map(|s| model.state_name(lp_common::StateId(s)).to_string())
                .collect(),
            actions: model.actions().map(|a| model.action_name(a).to_string()).collect(),
            observations: model.num_observations(),
            discount: model.discount(),
            fingerprint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlphaVectorDoc {
    pub action: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValueFunctionDoc {
    pub objective: String,
    pub priority: usize,
    pub alpha_vectors: Vec<AlphaVectorDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoundDoc {
    pub round: u32,
    pub belief_points: usize,
    pub points_added: usize,
    pub final_residuals: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatsDoc {
    pub sweeps: u32,
    pub sweeps_per_objective: Vec<u32>,
    pub error_bounds: Vec<f64>,
    pub expansion_rule: String,
    pub rounds: Vec<RoundDoc>,
}

impl From<&SolveStats> for StatsDoc {
    fn from(stats: &SolveStats) -> Self {
        StatsDoc {
            sweeps: stats.calibration.sweeps,
            sweeps_per_objective: stats.calibration.per_objective.clone(),
            error_bounds: stats.calibration.error_bounds.clone(),
            expansion_rule: stats.expansion_rule.clone(),
            rounds: stats
                .rounds
                .iter()
                .map(|r| RoundDoc {
                    round: r.round,
                    belief_points: r.belief_points,
                    points_added: r.points_added,
                    final_residuals: r.final_residuals.clone(),
                })
                .collect(),
        }
    }
}

/// Serialized solve result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocument {
    pub schema_version: String,
    pub generated_at: String,
    pub run_id: String,
    pub model: ModelSummary,
    #[schemars(with = "serde_json::Value")]
    pub config: ConfigSnapshot,
    pub stats: StatsDoc,
    /// One entry per objective, highest priority first.
    pub value_functions: Vec<ValueFunctionDoc>,
    /// Dense belief points of the final round.
    pub belief_points: Vec<Vec<f64>>,
}

impl PolicyDocument {
    pub fn build(
        run_id: &str,
        model: &LexPomdp,
        model_fingerprint: String,
        config: ConfigSnapshot,
        policy: &LexicographicPolicy,
    ) -> Self {
        let value_functions = policy
            .value_functions()
            .iter()
            .enumerate()
            .map(|(priority, vf)| ValueFunctionDoc {
                objective: policy.objectives()[priority].clone(),
                priority,
                alpha_vectors: vf
                    .iter()
                    .map(|alpha| AlphaVectorDoc {
                        action: model.action_name(alpha.action()).to_string(),
                        values: alpha.values().to_vec(),
                    })
                    .collect(),
            })
            .collect();

        PolicyDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            run_id: run_id.to_string(),
            model: ModelSummary::from_model(model, model_fingerprint),
            config,
            stats: StatsDoc::from(policy.stats()),
            value_functions,
            belief_points: policy.belief_points().iter().map(|b| b.to_dense()).collect(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Md => Ok(self.to_markdown()),
            OutputFormat::Summary => Ok(self.summary_line()),
        }
    }

    pub fn summary_line(&self) -> String {
        let vectors: Vec<String> = self
            .value_functions
            .iter()
            .map(|vf| format!("{}={}", vf.objective, vf.alpha_vectors.len()))
            .collect();
        format!(
            "[{}] {}: {} rounds, {} sweeps/objective, {} belief points, alpha vectors {}",
            self.run_id,
            self.model.name.as_deref().unwrap_or("model"),
            self.stats.rounds.len(),
            self.stats.sweeps,
            self.belief_points.len(),
            vectors.join(" ")
        )
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# Policy: {}\n",
            self.model.name.as_deref().unwrap_or("unnamed model")
        );
        let _ = writeln!(out, "- run: `{}`", self.run_id);
        let _ = writeln!(out, "- generated: {}", self.generated_at);
        let _ = writeln!(out, "- model sha256: `{}`", self.model.fingerprint);
        let _ = writeln!(out, "- config: `{}`", self.config.short_id());
        let _ = writeln!(
            out,
            "- sweeps per objective: {} (expansion: {})\n",
            self.stats.sweeps, self.stats.expansion_rule
        );

        let _ = writeln!(out, "| round | belief points | added |");
        let _ = writeln!(out, "|------:|--------------:|------:|");
        for r in &self.stats.rounds {
            let _ = writeln!(out, "| {} | {} | {} |", r.round, r.belief_points, r.points_added);
        }

        for vf in &self.value_functions {
            let _ = writeln!(out, "\n## {}. {}\n", vf.priority + 1, vf.objective);
            let _ = writeln!(out, "| action | {} |", self.model.states.join(" | "));
            let _ = writeln!(out, "|---|{}", "---:|".repeat(self.model.states.len()));
            for alpha in &vf.alpha_vectors {
                let values: Vec<String> = alpha.values.iter().map(|v| format!("{v:.4}")).collect();
                let _ = writeln!(out, "| {} | {} |", alpha.action, values.join(" | "));
            }
        }
        out
    }
}
