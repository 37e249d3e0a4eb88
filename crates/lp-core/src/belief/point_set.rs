//! Growable set of sample beliefs.
//!
//! The point set is owned by one solve. Points are appended between
//! expansion rounds and never removed, so point indices stay stable for the
//! lifetime of the solve.

use super::BeliefState;

/// Two beliefs closer than this in L1 are treated as the same point.
pub const DUPLICATE_TOLERANCE: f64 = 1e-9;

/// Ordered collection of belief points.
#[derive(Debug, Clone, Default)]
pub struct BeliefPointSet {
    points: Vec<BeliefState>,
    limit: Option<usize>,
}

impl BeliefPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the seed beliefs verbatim. Duplicate filtering applies only to
    /// points added later by expansion.
    pub fn from_seed(seed: &[BeliefState]) -> Self {
        BeliefPointSet {
            points: seed.to_vec(),
            limit: None,
        }
    }

    /// Cap the number of points; further pushes are refused once reached.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True once the configured cap has been reached.
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|cap| self.points.len() >= cap)
    }

    pub fn get(&self, index: usize) -> Option<&BeliefState> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BeliefState> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[BeliefState] {
        &self.points
    }

    /// Append a belief unless it duplicates an existing point or the set is
    /// full. Returns whether the point was added.
    pub fn push(&mut self, belief: BeliefState) -> bool {
        if self.is_full() || self.contains_near(&belief, DUPLICATE_TOLERANCE) {
            return false;
        }
        self.points.push(belief);
        true
    }

    /// Append every belief, returning how many were added.
    pub fn extend(&mut self, beliefs: impl IntoIterator<Item = BeliefState>) -> usize {
        let mut added = 0;
        for belief in beliefs {
            if self.push(belief) {
                added += 1;
            }
        }
        added
    }

    /// True when some point lies within `tolerance` (L1) of `belief`.
    pub fn contains_near(&self, belief: &BeliefState, tolerance: f64) -> bool {
        self.points
            .iter()
            .any(|p| p.l1_distance(belief) < tolerance)
    }

    /// L1 distance from `belief` to the closest point, or None when empty.
    pub fn min_distance(&self, belief: &BeliefState) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.l1_distance(belief))
            .reduce(f64::min)
    }
}

impl<'a> IntoIterator for &'a BeliefPointSet {
    type Item = &'a BeliefState;
    type IntoIter = std::slice::Iter<'a, BeliefState>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
