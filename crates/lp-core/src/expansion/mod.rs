//! Belief-point expansion strategies.
//!
//! After each round the solver hands the current point set and the freshly
//! solved value functions to a [`BeliefExpansion`], which appends new points
//! for the next round. Strategies own their random state, so one strategy
//! instance seeded once drives every round of a solve.

pub mod greedy_error;
pub mod random_selection;
pub mod stochastic;

pub use greedy_error::GreedyErrorReduction;
pub use random_selection::RandomBeliefSelection;
pub use stochastic::{StochasticSimulationExploratoryAction, StochasticSimulationRandomAction};

use lp_config::ExpansionRule;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::belief::{self, BeliefPointSet, BeliefState};
use crate::model::LexPomdp;
use crate::solver::ValueFunction;
use lp_common::{ActionId, ObservationId, StateId};

/// Errors raised while expanding a point set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpansionError {
    #[error("{strategy} expansion needs a solved value function for objective 0")]
    MissingValueFunction { strategy: &'static str },
}

/// What a strategy may look at when choosing new points.
pub struct ExpansionContext<'a> {
    pub model: &'a LexPomdp,
    /// Value functions from the round just finished, highest priority first.
    pub value_functions: &'a [ValueFunction],
    /// Zero-based round that produced `value_functions`.
    pub round: u32,
}

/// A rule for growing the belief point set between rounds.
pub trait BeliefExpansion: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// True for the no-op rule; the solver stops after one round.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Append new points to `points`. Returns how many were added.
    fn expand(
        &mut self,
        points: &mut BeliefPointSet,
        ctx: &ExpansionContext<'_>,
    ) -> Result<usize, ExpansionError>;
}

/// Leaves the point set unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExpansion;

impl BeliefExpansion for NoExpansion {
    fn name(&self) -> &'static str {
        ExpansionRule::None.short_name()
    }

    fn is_terminal(&self) -> bool {
        true
    }

    fn expand(
        &mut self,
        _points: &mut BeliefPointSet,
        _ctx: &ExpansionContext<'_>,
    ) -> Result<usize, ExpansionError> {
        Ok(0)
    }
}

/// Build the strategy for a configured rule.
pub fn strategy_for(rule: ExpansionRule, seed: u64) -> Box<dyn BeliefExpansion> {
    match rule {
        ExpansionRule::None => Box::new(NoExpansion),
        ExpansionRule::RandomBeliefSelection => Box::new(RandomBeliefSelection::new(seed)),
        ExpansionRule::StochasticSimulationRandomAction => {
            Box::new(StochasticSimulationRandomAction::new(seed))
        }
        ExpansionRule::StochasticSimulationExploratoryAction => {
            Box::new(StochasticSimulationExploratoryAction::new(seed))
        }
        ExpansionRule::GreedyErrorReduction => Box::new(GreedyErrorReduction::new()),
    }
}

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Simulate one step from `belief`: draw `s ~ b`, `s' ~ T(·|s,a)` and
/// `z ~ O(·|s',a)`, then return `τ(b, a, z)`.
pub(crate) fn simulate_step(
    model: &LexPomdp,
    belief: &BeliefState,
    action: ActionId,
    rng: &mut StdRng,
) -> Option<BeliefState> {
    let state = belief.sample(rng.random::<f64>())?;
    let next = lp_math::simplex::sample_sparse(model.transition(state, action), rng.random::<f64>())?;
    let z = lp_math::simplex::sample_sparse(
        model.observation(action, StateId(next)),
        rng.random::<f64>(),
    )?;
    belief::update(model, belief, action, ObservationId(z))
}
