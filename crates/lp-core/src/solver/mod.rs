//! Lexicographic point-based value iteration.
//!
//! Objectives are solved independently in priority order over the same
//! belief point set and the same (unrestricted) action set. Slack is checked
//! but does not restrict actions between objectives.

pub mod alpha;
pub mod backup;
pub mod cache;
pub mod calibrate;
pub mod error;
pub mod lpbvi;
pub mod policy;
pub mod value_function;

pub use alpha::AlphaVector;
pub use backup::backup;
pub use cache::{BaselineCache, ProjectionCache};
pub use calibrate::{calibrate, Calibration};
pub use error::SolveError;
pub use lpbvi::LpbviSolver;
pub use policy::{LexicographicPolicy, RoundStats, SolveStats};
pub use value_function::ValueFunction;

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, SolveError>;
