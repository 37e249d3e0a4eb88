//! Per-objective value functions (gamma sets).

use lp_common::ActionId;
use serde::Serialize;

use super::alpha::{best_index, AlphaVector};
use crate::belief::BeliefState;

/// Ordered set of alpha vectors for one objective.
///
/// The value at a belief is the upper envelope `max_α α · b`. Ties resolve to
/// the earliest vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueFunction {
    vectors: Vec<AlphaVector>,
}

impl ValueFunction {
    pub fn new(vectors: Vec<AlphaVector>) -> Self {
        ValueFunction { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlphaVector> {
        self.vectors.iter()
    }

    pub fn vectors(&self) -> &[AlphaVector] {
        &self.vectors
    }

    /// Value of a belief, or None for an empty set.
    pub fn value(&self, belief: &BeliefState) -> Option<f64> {
        best_index(&self.vectors, belief).map(|(_, v)| v)
    }

    /// Vector attaining the value at a belief.
    pub fn best_vector(&self, belief: &BeliefState) -> Option<&AlphaVector> {
        best_index(&self.vectors, belief).map(|(i, _)| &self.vectors[i])
    }

    /// Action of the vector attaining the value at a belief.
    pub fn best_action(&self, belief: &BeliefState) -> Option<ActionId> {
        self.best_vector(belief).map(AlphaVector::action)
    }
}

impl<'a> IntoIterator for &'a ValueFunction {
    type Item = &'a AlphaVector;
    type IntoIter = std::slice::Iter<'a, AlphaVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}
