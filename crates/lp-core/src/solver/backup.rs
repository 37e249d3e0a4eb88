//! Point-based Bellman backup.

use super::{AlphaVector, BaselineCache, ProjectionCache};
use crate::belief::BeliefState;
use crate::logging::events::event_names;

/// Back up one belief point against the previous generation.
///
/// For every action `a`, the candidate is `Γ^{a,*}` plus, for each
/// observation, the projected vector maximizing `· b`. The candidate with the
/// largest value at `b` is returned. Ties go to the earliest candidate in
/// both comparisons.
///
/// Returns None only when the action set is empty.
pub fn backup(
    belief: &BeliefState,
    baseline: &BaselineCache,
    projections: &ProjectionCache,
) -> Option<AlphaVector> {
    let mut best: Option<(AlphaVector, f64)> = None;

    for (ai, base) in baseline.vectors().iter().enumerate() {
        let mut candidate = base.clone();
        for z in 0..projections.num_observations() {
            if let Some(winner) = best_projection(belief, projections, ai, z) {
                candidate.add_assign(winner);
            }
        }
        let value = candidate.dot(belief);
        match &best {
            Some((_, best_value)) if value <= *best_value => {}
            _ => best = Some((candidate, value)),
        }
    }

    best.map(|(alpha, value)| {
        tracing::trace!(
            target: event_names::SOLVE_BACKUP_WINNER,
            action = alpha.action().index(),
            value,
            "backup winner"
        );
        alpha
    })
}

fn best_projection<'a>(
    belief: &BeliefState,
    projections: &'a ProjectionCache,
    action_index: usize,
    z: usize,
) -> Option<&'a [f64]> {
    let mut best: Option<(&[f64], f64)> = None;
    for candidate in projections.candidates(action_index, z) {
        let v = belief.dot(candidate);
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((candidate, v)),
        }
    }
    best.map(|(c, _)| c)
}
