//! Belief states, Bayesian updates, and the solver's belief point set.

pub mod belief_state;
pub mod point_set;
pub mod update;

pub use belief_state::{BeliefState, BeliefStateError};
pub use point_set::{BeliefPointSet, DUPLICATE_TOLERANCE};
pub use update::{observation_distribution, observation_likelihood, predict, update};
