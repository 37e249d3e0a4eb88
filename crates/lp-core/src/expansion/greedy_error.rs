//! Greedy error reduction.
//!
//! For a point `b` with best vector `α` under the highest-priority objective,
//! the error bound at a successor `b'` is
//!
//! ```text
//! ε(b') = Σ_s (Vmax − α(s)) (b'(s) − b(s))   where b'(s) ≥ b(s)
//!       + Σ_s (Vmin − α(s)) (b'(s) − b(s))   where b'(s) < b(s)
//! ```
//!
//! with `Vmax = Rmax / (1 − γ)` and `Vmin = Rmin / (1 − γ)`. The action with
//! the largest expected error `Σ_z P(z | b, a) ε(τ(b, a, z))` is chosen, and
//! its successor with the largest error is added.

use lp_common::{ActionId, StateId};

use super::{BeliefExpansion, ExpansionContext, ExpansionError};
use crate::belief::{self, BeliefPointSet, BeliefState};
use crate::solver::AlphaVector;

/// Deterministic expansion toward the largest projected value error.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyErrorReduction;

impl GreedyErrorReduction {
    pub fn new() -> Self {
        GreedyErrorReduction
    }
}

struct Bounds {
    v_max: f64,
    v_min: f64,
}

fn error_at(from: &BeliefState, to: &BeliefState, alpha: &AlphaVector, bounds: &Bounds) -> f64 {
    let mut total = 0.0;
    for (s, &a) in alpha.values().iter().enumerate() {
        let delta = to.prob(StateId(s)) - from.prob(StateId(s));
        let bound = if delta >= 0.0 {
            bounds.v_max
        } else {
            bounds.v_min
        };
        total += (bound - a) * delta;
    }
    total
}

/// Largest-error successor of `b`, or None when no observation is possible.
fn best_successor(
    ctx: &ExpansionContext<'_>,
    b: &BeliefState,
    alpha: &AlphaVector,
    bounds: &Bounds,
) -> Option<BeliefState> {
    let mut best_action: Option<(Vec<(BeliefState, f64)>, f64)> = None;
    for action in ctx.model.actions() {
        let successors = successors(ctx, b, action, alpha, bounds);
        let expected: f64 = successors.iter().map(|(_, (p, e))| p * e).sum();
        let successors: Vec<(BeliefState, f64)> =
            successors.into_iter().map(|(s, (_, e))| (s, e)).collect();
        match &best_action {
            Some((_, best)) if expected <= *best => {}
            _ => best_action = Some((successors, expected)),
        }
    }

    let (successors, _) = best_action?;
    let mut best: Option<(BeliefState, f64)> = None;
    for (next, err) in successors {
        match &best {
            Some((_, e)) if err <= *e => {}
            _ => best = Some((next, err)),
        }
    }
    best.map(|(b, _)| b)
}

/// Every reachable successor under `action` with its probability and error.
fn successors(
    ctx: &ExpansionContext<'_>,
    b: &BeliefState,
    action: ActionId,
    alpha: &AlphaVector,
    bounds: &Bounds,
) -> Vec<(BeliefState, (f64, f64))> {
    belief::observation_distribution(ctx.model, b, action)
        .into_iter()
        .filter_map(|(z, p)| {
            let next = belief::update(ctx.model, b, action, z)?;
            let err = error_at(b, &next, alpha, bounds);
            Some((next, (p, err)))
        })
        .collect()
}

impl BeliefExpansion for GreedyErrorReduction {
    fn name(&self) -> &'static str {
        "ger"
    }

    fn expand(
        &mut self,
        points: &mut BeliefPointSet,
        ctx: &ExpansionContext<'_>,
    ) -> Result<usize, ExpansionError> {
        let primary = ctx
            .value_functions
            .first()
            .filter(|vf| !vf.is_empty())
            .ok_or(ExpansionError::MissingValueFunction {
                strategy: self.name(),
            })?;
        let discount = ctx.model.discount();
        let range = ctx.model.objective(0).range();
        let bounds = Bounds {
            v_max: range.max / (1.0 - discount),
            v_min: range.min / (1.0 - discount),
        };

        let snapshot: Vec<BeliefState> = points.as_slice().to_vec();
        let mut added = 0;
        for b in &snapshot {
            if points.is_full() {
                break;
            }
            let Some(alpha) = primary.best_vector(b) else {
                continue;
            };
            if let Some(next) = best_successor(ctx, b, alpha, &bounds) {
                if points.push(next) {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}
