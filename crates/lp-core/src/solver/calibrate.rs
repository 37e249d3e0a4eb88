//! Sweep-count calibration.
//!
//! The sweep count is chosen once per solve so the contraction bound
//! `γ^N · (Rmax − Rmin) / (1 − γ)` of every objective falls below the
//! configured tolerance. The largest per-objective count is used for all
//! objectives.

use lp_math::{error_bound, required_sweeps};
use serde::Serialize;

use super::SolveError;
use crate::model::LexPomdp;

/// Result of calibrating the sweep count for a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    /// Sweeps required by each objective on its own.
    pub per_objective: Vec<u32>,
    /// Sweeps actually run for every objective.
    pub sweeps: u32,
    /// Contraction bound of each objective after `sweeps` sweeps.
    pub error_bounds: Vec<f64>,
}

/// Compute the sweep count for `model` at tolerance `epsilon`.
pub fn calibrate(model: &LexPomdp, epsilon: f64) -> Result<Calibration, SolveError> {
    let horizon = model.horizon();
    if !horizon.is_infinite() {
        return Err(SolveError::FiniteHorizon(horizon));
    }
    let discount = horizon.discount();

    let mut per_objective = Vec::with_capacity(model.num_objectives());
    for objective in model.objectives() {
        let n = required_sweeps(epsilon, &objective.range(), discount)
            .ok_or(SolveError::InvalidTolerance(epsilon))?;
        per_objective.push(n);
    }
    let sweeps = per_objective.iter().copied().max().unwrap_or(0);
    let error_bounds = model
        .objectives()
        .iter()
        .map(|o| error_bound(sweeps, &o.range(), discount))
        .collect();

    Ok(Calibration {
        per_objective,
        sweeps,
        error_bounds,
    })
}
