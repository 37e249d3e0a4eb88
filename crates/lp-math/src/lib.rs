//! Lexicographic PBVI math utilities.

pub mod math;

pub use math::contraction::*;
pub use math::simplex;
pub use math::vector::*;
