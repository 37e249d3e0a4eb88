//! Per-objective and per-sweep caches used by the point-based backup.
//!
//! ```text
//! Γ^{a,*}(s)      = Σ_{s'} Σ_z T(s' | s, a) · O(z | s', a) · r(s, a)
//! Γ^{a,z}_k(s)    = γ · Σ_{s'} T(s' | s, a) · O(z | s', a) · α_k(s')
//! ```
//!
//! The baseline is built once per objective and reused by every sweep. The
//! projections depend on the previous generation and are rebuilt each sweep.

use lp_common::{ActionId, StateId};

use super::AlphaVector;
use crate::model::LexPomdp;

/// Immediate-reward vector of every action for one objective.
#[derive(Debug, Clone)]
pub struct BaselineCache {
    vectors: Vec<AlphaVector>,
}

impl BaselineCache {
    /// Build `Γ^{a,*}` for `objective` over the given action set.
    pub fn build(model: &LexPomdp, objective: usize, actions: &[ActionId]) -> Self {
        let reward = model.objective(objective);
        let num_states = model.num_states();
        let vectors = actions
            .iter()
            .map(|&a| {
                let mut values = vec![0.0; num_states];
                for (s, v) in values.iter_mut().enumerate() {
                    let state = StateId(s);
                    let r = reward.value(state, a);
                    let mut mass = 0.0;
                    for &(s2, t) in model.transition(state, a) {
                        for &(_, o) in model.observation(a, StateId(s2)) {
                            mass += t * o;
                        }
                    }
                    *v = mass * r;
                }
                AlphaVector::new(a, values)
            })
            .collect();
        BaselineCache { vectors }
    }

    /// One vector per action, in action-set order.
    pub fn vectors(&self) -> &[AlphaVector] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Discounted projections of the previous generation through every
/// `(action, observation)` pair.
#[derive(Debug, Clone)]
pub struct ProjectionCache {
    num_states: usize,
    num_observations: usize,
    num_vectors: usize,
    /// `blocks[ai * Z + z]` holds `num_vectors` projected vectors laid out
    /// back to back, each `num_states` long.
    blocks: Vec<Vec<f64>>,
}

impl ProjectionCache {
    /// Project `previous` through the model for every action in `actions`.
    pub fn build(model: &LexPomdp, previous: &[AlphaVector], actions: &[ActionId]) -> Self {
        let num_states = model.num_states();
        let num_observations = model.num_observations();
        let num_vectors = previous.len();
        let discount = model.discount();

        let mut blocks = vec![vec![0.0; num_vectors * num_states]; actions.len() * num_observations];
        for (ai, &a) in actions.iter().enumerate() {
            for s in 0..num_states {
                for &(s2, t) in model.transition(StateId(s), a) {
                    for &(z, o) in model.observation(a, StateId(s2)) {
                        let w = discount * t * o;
                        let block = &mut blocks[ai * num_observations + z];
                        for (k, alpha) in previous.iter().enumerate() {
                            block[k * num_states + s] += w * alpha.values()[s2];
                        }
                    }
                }
            }
        }

        ProjectionCache {
            num_states,
            num_observations,
            num_vectors,
            blocks,
        }
    }

    pub fn num_vectors(&self) -> usize {
        self.num_vectors
    }

    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// Projected vector `k` for the action at position `action_index` and
    /// observation `z`.
    pub fn get(&self, action_index: usize, z: usize, k: usize) -> &[f64] {
        let block = &self.blocks[action_index * self.num_observations + z];
        &block[k * self.num_states..(k + 1) * self.num_states]
    }

    /// All projected vectors for one `(action, observation)` pair.
    pub fn candidates(&self, action_index: usize, z: usize) -> impl Iterator<Item = &[f64]> {
        let block = &self.blocks[action_index * self.num_observations + z];
        block.chunks(self.num_states.max(1))
    }
}
