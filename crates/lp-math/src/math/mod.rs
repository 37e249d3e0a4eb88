//! Core math modules.

pub mod contraction;
pub mod simplex;
pub mod vector;
