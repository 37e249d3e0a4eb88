//! Stochastic simulation expansion.
//!
//! Both strategies take one simulated step from every existing point. They
//! differ in how the action is chosen and which successor is kept.

use lp_common::ActionId;
use rand::rngs::StdRng;
use rand::Rng;

use super::{seeded_rng, simulate_step, BeliefExpansion, ExpansionContext, ExpansionError};
use crate::belief::{BeliefPointSet, BeliefState};

/// One step under a uniformly random action; the successor is always kept.
pub struct StochasticSimulationRandomAction {
    rng: StdRng,
}

impl StochasticSimulationRandomAction {
    pub fn new(seed: u64) -> Self {
        StochasticSimulationRandomAction {
            rng: seeded_rng(seed),
        }
    }
}

impl BeliefExpansion for StochasticSimulationRandomAction {
    fn name(&self) -> &'static str {
        "ssra"
    }

    fn expand(
        &mut self,
        points: &mut BeliefPointSet,
        ctx: &ExpansionContext<'_>,
    ) -> Result<usize, ExpansionError> {
        let num_actions = ctx.model.num_actions();
        let snapshot: Vec<BeliefState> = points.as_slice().to_vec();
        let mut added = 0;
        for b in &snapshot {
            if points.is_full() {
                break;
            }
            let action = ActionId(self.rng.random_range(0..num_actions));
            if let Some(next) = simulate_step(ctx.model, b, action, &mut self.rng) {
                if points.push(next) {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}

/// One step under every action; keeps the successor farthest (L1) from the
/// current set.
pub struct StochasticSimulationExploratoryAction {
    rng: StdRng,
}

impl StochasticSimulationExploratoryAction {
    pub fn new(seed: u64) -> Self {
        StochasticSimulationExploratoryAction {
            rng: seeded_rng(seed),
        }
    }
}

impl BeliefExpansion for StochasticSimulationExploratoryAction {
    fn name(&self) -> &'static str {
        "ssea"
    }

    fn expand(
        &mut self,
        points: &mut BeliefPointSet,
        ctx: &ExpansionContext<'_>,
    ) -> Result<usize, ExpansionError> {
        let snapshot: Vec<BeliefState> = points.as_slice().to_vec();
        let mut added = 0;
        for b in &snapshot {
            if points.is_full() {
                break;
            }
            let mut farthest: Option<(BeliefState, f64)> = None;
            for action in ctx.model.actions() {
                let Some(next) = simulate_step(ctx.model, b, action, &mut self.rng) else {
                    continue;
                };
                let distance = points.min_distance(&next).unwrap_or(f64::INFINITY);
                match &farthest {
                    Some((_, d)) if distance <= *d => {}
                    _ => farthest = Some((next, distance)),
                }
            }
            if let Some((next, _)) = farthest {
                if points.push(next) {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LexPomdp;
    use crate::test_models;
    use lp_common::StateId;

    fn ctx(model: &LexPomdp) -> ExpansionContext<'_> {
        ExpansionContext {
            model,
            value_functions: &[],
            round: 0,
        }
    }

    #[test]
    fn random_action_successors_are_reachable() {
        let model = test_models::tiger();
        let mut points = BeliefPointSet::from_seed(model.initial_beliefs());
        let mut strategy = StochasticSimulationRandomAction::new(3);
        strategy.expand(&mut points, &ctx(&model)).unwrap();
        assert!(points.len() >= 3);
        for b in points.iter().skip(3) {
            let sum: f64 = b.support().map(|(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn exploratory_prefers_new_information() {
        // From uniform, opening a door returns to uniform (a duplicate) while
        // listening moves to 0.85 / 0.15, so listening's successor is kept.
        let model = test_models::tiger();
        let uniform = BeliefState::uniform(2).unwrap();
        let mut points = BeliefPointSet::from_seed(std::slice::from_ref(&uniform));
        let added = StochasticSimulationExploratoryAction::new(9)
            .expand(&mut points, &ctx(&model))
            .unwrap();
        assert_eq!(added, 1);
        let new = points.get(1).unwrap();
        let p = new.prob(StateId(0));
        assert!((p - 0.85).abs() < 1e-9 || (p - 0.15).abs() < 1e-9);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let model = test_models::tiger();
        let run = || {
            let mut points = BeliefPointSet::from_seed(model.initial_beliefs());
            let mut s = StochasticSimulationExploratoryAction::new(17);
            s.expand(&mut points, &ctx(&model)).unwrap();
            s.expand(&mut points, &ctx(&model)).unwrap();
            points.as_slice().to_vec()
        };
        assert_eq!(run(), run());
    }
}
