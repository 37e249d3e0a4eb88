//! Sparse belief states.
//!
//! A belief is a probability distribution over the model's states, stored as
//! `(state, probability)` pairs sorted by state with zero entries dropped.
//! Every constructor validates its input, so a `BeliefState` value always
//! sums to one.

use lp_common::StateId;
use lp_math::simplex::{self, PROB_TOLERANCE};
use serde::Serialize;
use thiserror::Error;

/// Error types for belief state construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeliefStateError {
    #[error("belief over an empty state space")]
    EmptyStateSpace,

    #[error("state index {state} out of range for {num_states} states")]
    StateOutOfRange { state: usize, num_states: usize },

    #[error("state index {0} listed more than once")]
    DuplicateState(usize),

    #[error("probability out of range [0, 1]: {0}")]
    ProbabilityOutOfRange(f64),

    #[error("invalid probability distribution: does not sum to 1.0 (sum={0})")]
    InvalidDistribution(f64),
}

/// Result type for belief state operations.
pub type Result<T> = std::result::Result<T, BeliefStateError>;

/// Probability distribution over states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefState {
    num_states: usize,
    probs: Vec<(usize, f64)>,
}

impl BeliefState {
    /// Build a belief from `(state, probability)` pairs.
    ///
    /// Pairs may come in any order. Zero entries are dropped and the result is
    /// renormalized to remove rounding drift within [`PROB_TOLERANCE`].
    pub fn from_pairs(
        num_states: usize,
        pairs: impl IntoIterator<Item = (StateId, f64)>,
    ) -> Result<Self> {
        if num_states == 0 {
            return Err(BeliefStateError::EmptyStateSpace);
        }
        let mut probs: Vec<(usize, f64)> = Vec::new();
        for (state, p) in pairs {
            if state.index() >= num_states {
                return Err(BeliefStateError::StateOutOfRange {
                    state: state.index(),
                    num_states,
                });
            }
            if !p.is_finite() || p < 0.0 || p > 1.0 + PROB_TOLERANCE {
                return Err(BeliefStateError::ProbabilityOutOfRange(p));
            }
            probs.push((state.index(), p));
        }
        probs.sort_by_key(|&(s, _)| s);
        if let Some(w) = probs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(BeliefStateError::DuplicateState(w[0].0));
        }
        probs.retain(|&(_, p)| p > 0.0);

        let sum: f64 = probs.iter().map(|&(_, p)| p).sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(BeliefStateError::InvalidDistribution(sum));
        }
        for (_, p) in probs.iter_mut() {
            *p /= sum;
        }
        Ok(BeliefState { num_states, probs })
    }

    /// Build a belief from a dense probability vector.
    pub fn from_dense(probs: &[f64]) -> Result<Self> {
        Self::from_pairs(
            probs.len(),
            probs.iter().enumerate().map(|(s, &p)| (StateId(s), p)),
        )
    }

    /// Build a belief by normalizing non-negative weights.
    ///
    /// Returns None when the weights carry no mass.
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        let mut dense = weights.to_vec();
        simplex::normalize(&mut dense)?;
        Self::from_dense(&dense).ok()
    }

    /// All mass on one state.
    pub fn certain(state: StateId, num_states: usize) -> Result<Self> {
        Self::from_pairs(num_states, [(state, 1.0)])
    }

    /// Equal mass on every state.
    pub fn uniform(num_states: usize) -> Result<Self> {
        if num_states == 0 {
            return Err(BeliefStateError::EmptyStateSpace);
        }
        let p = 1.0 / num_states as f64;
        Ok(BeliefState {
            num_states,
            probs: (0..num_states).map(|s| (s, p)).collect(),
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Probability of one state (zero when outside the support).
    pub fn prob(&self, state: StateId) -> f64 {
        self.probs
            .binary_search_by_key(&state.index(), |&(s, _)| s)
            .map(|i| self.probs[i].1)
            .unwrap_or(0.0)
    }

    /// States with positive probability, in state order.
    pub fn support(&self) -> impl Iterator<Item = (StateId, f64)> + '_ {
        self.probs.iter().map(|&(s, p)| (StateId(s), p))
    }

    /// Number of states with positive probability.
    pub fn support_len(&self) -> usize {
        self.probs.len()
    }

    /// Raw sparse pairs, sorted by state index.
    pub fn as_sparse(&self) -> &[(usize, f64)] {
        &self.probs
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.num_states];
        for &(s, p) in &self.probs {
            dense[s] = p;
        }
        dense
    }

    /// Expected value of a per-state vector under this belief.
    pub fn dot(&self, values: &[f64]) -> f64 {
        lp_math::dot_sparse(values, &self.probs)
    }

    /// L1 distance to another belief.
    pub fn l1_distance(&self, other: &BeliefState) -> f64 {
        simplex::l1_distance_sparse(&self.probs, &other.probs)
    }

    /// Draw a state given a uniform draw `u` in [0, 1).
    pub fn sample(&self, u: f64) -> Option<StateId> {
        simplex::sample_sparse(&self.probs, u).map(StateId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_and_drops_zeros() {
        let b = BeliefState::from_pairs(
            4,
            [(StateId(2), 0.25), (StateId(0), 0.75), (StateId(1), 0.0)],
        )
        .unwrap();
        assert_eq!(b.as_sparse(), &[(0, 0.75), (2, 0.25)]);
        assert_eq!(b.prob(StateId(1)), 0.0);
        assert_eq!(b.prob(StateId(2)), 0.25);
        assert_eq!(b.support_len(), 2);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert_eq!(
            BeliefState::from_pairs(0, Vec::new()),
            Err(BeliefStateError::EmptyStateSpace)
        );
        assert!(matches!(
            BeliefState::from_pairs(2, [(StateId(5), 1.0)]),
            Err(BeliefStateError::StateOutOfRange { state: 5, .. })
        ));
        assert_eq!(
            BeliefState::from_pairs(2, [(StateId(0), 0.5), (StateId(0), 0.5)]),
            Err(BeliefStateError::DuplicateState(0))
        );
        assert!(matches!(
            BeliefState::from_dense(&[-0.1, 1.1]),
            Err(BeliefStateError::ProbabilityOutOfRange(_))
        ));
        assert!(matches!(
            BeliefState::from_dense(&[0.3, 0.3]),
            Err(BeliefStateError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn tolerance_drift_is_renormalized() {
        let b = BeliefState::from_dense(&[0.5, 0.5000004]).unwrap();
        let sum: f64 = b.support().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn certain_and_uniform() {
        let c = BeliefState::certain(StateId(1), 3).unwrap();
        assert_eq!(c.to_dense(), vec![0.0, 1.0, 0.0]);
        let u = BeliefState::uniform(4).unwrap();
        assert_eq!(u.support_len(), 4);
        assert!((u.prob(StateId(3)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn from_weights_normalizes() {
        let b = BeliefState::from_weights(&[2.0, 0.0, 6.0]).unwrap();
        assert_eq!(b.to_dense(), vec![0.25, 0.0, 0.75]);
        assert!(BeliefState::from_weights(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn dot_and_distance() {
        let a = BeliefState::from_dense(&[0.5, 0.5, 0.0]).unwrap();
        let b = BeliefState::certain(StateId(2), 3).unwrap();
        assert_eq!(a.dot(&[2.0, 4.0, 100.0]), 3.0);
        assert!((a.l1_distance(&b) - 2.0).abs() < 1e-12);
        assert_eq!(a.l1_distance(&a), 0.0);
    }

    #[test]
    fn sample_follows_cdf() {
        let b = BeliefState::from_dense(&[0.25, 0.0, 0.75]).unwrap();
        assert_eq!(b.sample(0.1), Some(StateId(0)));
        assert_eq!(b.sample(0.5), Some(StateId(2)));
    }
}
