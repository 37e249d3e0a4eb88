//! Solve output.

use lp_common::ActionId;
use serde::Serialize;

use super::{Calibration, ValueFunction};
use crate::belief::BeliefState;

/// Per-round bookkeeping of one solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundStats {
    pub round: u32,
    pub belief_points: usize,
    /// Per objective, the largest change in value at any belief point made
    /// by the final sweep relative to the one before it. None when no sweeps
    /// ran.
    pub final_residuals: Vec<Option<f64>>,
    pub points_added: usize,
}

/// Summary of a finished solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveStats {
    pub calibration: Calibration,
    pub expansion_rule: String,
    pub rounds: Vec<RoundStats>,
}

impl SolveStats {
    pub fn rounds_run(&self) -> usize {
        self.rounds.len()
    }

    pub fn sweeps_per_round(&self) -> u32 {
        self.calibration.sweeps
    }

    pub fn final_belief_points(&self) -> usize {
        self.rounds.last().map(|r| r.belief_points).unwrap_or(0)
    }
}

/// One value function per objective, highest priority first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicographicPolicy {
    objectives: Vec<String>,
    value_functions: Vec<ValueFunction>,
    belief_points: Vec<BeliefState>,
    stats: SolveStats,
}

impl LexicographicPolicy {
    pub(crate) fn new(
        objectives: Vec<String>,
        value_functions: Vec<ValueFunction>,
        belief_points: Vec<BeliefState>,
        stats: SolveStats,
    ) -> Self {
        LexicographicPolicy {
            objectives,
            value_functions,
            belief_points,
            stats,
        }
    }

    /// Objective names in priority order.
    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    pub fn value_function(&self, objective: usize) -> Option<&ValueFunction> {
        self.value_functions.get(objective)
    }

    pub fn value_functions(&self) -> &[ValueFunction] {
        &self.value_functions
    }

    /// Belief points the final round was solved on.
    pub fn belief_points(&self) -> &[BeliefState] {
        &self.belief_points
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Value of `belief` under every objective.
    pub fn values_at(&self, belief: &BeliefState) -> Vec<f64> {
        self.value_functions
            .iter()
            .map(|vf| vf.value(belief).unwrap_or(0.0))
            .collect()
    }

    /// Best action of every objective at `belief`.
    pub fn actions_at(&self, belief: &BeliefState) -> Vec<Option<ActionId>> {
        self.value_functions
            .iter()
            .map(|vf| vf.best_action(belief))
            .collect()
    }

    /// Action of the highest-priority objective at `belief`.
    ///
    /// Slack is not consulted; lower objectives never override objective 0.
    pub fn action_at(&self, belief: &BeliefState) -> Option<ActionId> {
        self.value_functions.first()?.best_action(belief)
    }
}
