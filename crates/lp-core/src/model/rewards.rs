//! Factored per-objective reward tables.

use lp_common::{ActionId, StateId};
use lp_math::RewardRange;

/// Dense `r_i(s, a)` table for one objective.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveReward {
    name: String,
    num_actions: usize,
    /// Row-major by state: `values[s * num_actions + a]`.
    values: Vec<f64>,
    range: RewardRange,
}

impl ObjectiveReward {
    /// Build from a dense table. The caller guarantees every value is finite
    /// and `values.len()` is a multiple of `num_actions`.
    pub(crate) fn new(name: String, num_actions: usize, values: Vec<f64>) -> Self {
        let (min, max) = lp_math::min_max(&values).unwrap_or((0.0, 0.0));
        ObjectiveReward {
            name,
            num_actions,
            values,
            range: RewardRange::new(min, max),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, state: StateId, action: ActionId) -> f64 {
        self.values[state.index() * self.num_actions + action.index()]
    }

    /// Minimum and maximum reward over all state-action pairs.
    pub fn range(&self) -> RewardRange {
        self.range
    }

    /// Rewards of every state under one action, indexed by state.
    pub fn column(&self, action: ActionId) -> Vec<f64> {
        self.values
            .chunks(self.num_actions)
            .map(|row| row[action.index()])
            .collect()
    }
}
