//! Discounted contraction bounds for value iteration.
//!
//! After `N` synchronous Bellman sweeps starting from any bounded value
//! function, the distance to the fixed point is bounded by
//! `γ^N · (Rmax − Rmin) / (1 − γ)`. The sweep count that drives the
//! (log-form) bound below a target error ε is
//!
//! ```text
//! N = ceil( (ln ε − ln(Rmax − Rmin)) / ln γ )
//! ```

use serde::{Deserialize, Serialize};

/// Smallest reward span used in the bound; avoids `ln(0)` for flat rewards.
pub const MIN_REWARD_SPAN: f64 = 1e-6;

/// Closed range of a reward function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRange {
    pub min: f64,
    pub max: f64,
}

impl RewardRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range, floored at [`MIN_REWARD_SPAN`].
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span < MIN_REWARD_SPAN {
            MIN_REWARD_SPAN
        } else {
            span
        }
    }
}

/// Number of sweeps needed for the contraction bound to fall below `epsilon`.
///
/// Returns None when `epsilon` is not a positive finite number or the
/// discount is outside (0, 1). A non-positive result is clamped to zero.
pub fn required_sweeps(epsilon: f64, range: &RewardRange, discount: f64) -> Option<u32> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return None;
    }
    if !(discount > 0.0 && discount < 1.0) {
        return None;
    }
    let raw = (epsilon.ln() - range.span().ln()) / discount.ln();
    if !raw.is_finite() {
        return None;
    }
    let sweeps = raw.ceil();
    if sweeps <= 0.0 {
        Some(0)
    } else if sweeps >= u32::MAX as f64 {
        Some(u32::MAX)
    } else {
        Some(sweeps as u32)
    }
}

/// Contraction error bound after `sweeps` sweeps: `γ^N · span / (1 − γ)`.
pub fn error_bound(sweeps: u32, range: &RewardRange, discount: f64) -> f64 {
    discount.powf(sweeps as f64) * range.span() / (1.0 - discount)
}
