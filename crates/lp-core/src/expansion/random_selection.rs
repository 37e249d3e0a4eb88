//! Random belief selection.

use rand::rngs::StdRng;
use rand::Rng;

use super::{seeded_rng, BeliefExpansion, ExpansionContext, ExpansionError};
use crate::belief::{BeliefPointSet, BeliefState};

/// Adds one belief drawn uniformly from the simplex per existing point.
pub struct RandomBeliefSelection {
    rng: StdRng,
}

impl RandomBeliefSelection {
    pub fn new(seed: u64) -> Self {
        RandomBeliefSelection {
            rng: seeded_rng(seed),
        }
    }

    fn sample(&mut self, num_states: usize) -> Option<BeliefState> {
        // `random` is in [0, 1); flip it so the log in `from_uniforms` is finite.
        let uniforms: Vec<f64> = (0..num_states)
            .map(|_| 1.0 - self.rng.random::<f64>())
            .collect();
        let dense = lp_math::simplex::from_uniforms(&uniforms)?;
        BeliefState::from_dense(&dense).ok()
    }
}

impl BeliefExpansion for RandomBeliefSelection {
    fn name(&self) -> &'static str {
        "random"
    }

    fn expand(
        &mut self,
        points: &mut BeliefPointSet,
        ctx: &ExpansionContext<'_>,
    ) -> Result<usize, ExpansionError> {
        let num_states = ctx.model.num_states();
        let mut added = 0;
        for _ in 0..points.len() {
            if points.is_full() {
                break;
            }
            if let Some(b) = self.sample(num_states) {
                if points.push(b) {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}
