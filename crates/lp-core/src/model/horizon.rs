//! Planning horizon and discount.

use serde::{Deserialize, Serialize};

/// Planning horizon.
///
/// Only [`Horizon::Infinite`] is solvable; a finite horizon is representable
/// so the solver can reject it as a configuration error rather than a
/// malformed model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Horizon {
    Infinite { discount: f64 },
    Finite { discount: f64, steps: u32 },
}

impl Horizon {
    pub fn discount(&self) -> f64 {
        match self {
            Horizon::Infinite { discount } | Horizon::Finite { discount, .. } => *discount,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Horizon::Infinite { .. })
    }

    /// True when the discount is usable for this horizon: strictly inside
    /// (0, 1) when infinite, (0, 1] when finite.
    pub fn has_valid_discount(&self) -> bool {
        match *self {
            Horizon::Infinite { discount } => discount > 0.0 && discount < 1.0,
            Horizon::Finite { discount, .. } => discount > 0.0 && discount <= 1.0,
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Horizon::Infinite { discount } => write!(f, "infinite (γ={})", discount),
            Horizon::Finite { discount, steps } => {
                write!(f, "finite {} steps (γ={})", steps, discount)
            }
        }
    }
}
