//! Alpha vectors.

use lp_common::ActionId;
use serde::Serialize;

use crate::belief::BeliefState;

/// Linear value function over states, tagged with the action whose backup
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlphaVector {
    action: ActionId,
    values: Vec<f64>,
}

impl AlphaVector {
    pub fn new(action: ActionId, values: Vec<f64>) -> Self {
        AlphaVector { action, values }
    }

    /// All-zero vector over `num_states` states.
    pub fn zeros(action: ActionId, num_states: usize) -> Self {
        AlphaVector {
            action,
            values: vec![0.0; num_states],
        }
    }

    pub fn action(&self) -> ActionId {
        self.action
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `α · b = Σ_s α(s) b(s)`.
    pub fn dot(&self, belief: &BeliefState) -> f64 {
        belief.dot(&self.values)
    }

    /// Pointwise `α += other`, the cross-sum step of a backup.
    pub fn add_assign(&mut self, other: &[f64]) {
        lp_math::add_assign(&mut self.values, other);
    }

    pub fn is_finite(&self) -> bool {
        lp_math::all_finite(&self.values)
    }
}

/// Largest `α · b` over a set of vectors, with the index of the first vector
/// that attains it.
pub fn best_index(vectors: &[AlphaVector], belief: &BeliefState) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, alpha) in vectors.iter().enumerate() {
        let v = alpha.dot(belief);
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use lp_common::StateId;

    #[test]
    fn dot_is_expectation() {
        let a = AlphaVector::new(ActionId(0), vec![1.0, 3.0]);
        let b = BeliefState::from_dense(&[0.25, 0.75]).unwrap();
        assert_eq!(a.dot(&b), 2.5);
    }

    #[test]
    fn add_assign_is_pointwise() {
        let mut a = AlphaVector::zeros(ActionId(1), 3);
        a.add_assign(&[1.0, 2.0, 3.0]);
        a.add_assign(&[1.0, 0.0, -3.0]);
        assert_eq!(a.values(), &[2.0, 2.0, 0.0]);
        assert_eq!(a.action(), ActionId(1));
    }

    #[test]
    fn best_index_keeps_first_on_ties() {
        let vs = vec![
            AlphaVector::new(ActionId(0), vec![1.0, 0.0]),
            AlphaVector::new(ActionId(1), vec![1.0, 0.0]),
            AlphaVector::new(ActionId(2), vec![0.0, 0.5]),
        ];
        let b = BeliefState::certain(StateId(0), 2).unwrap();
        assert_eq!(best_index(&vs, &b), Some((0, 1.0)));
        assert_eq!(best_index(&[], &b), None);
    }
}
