//! Lexicographic PBVI configuration loading and validation.
//!
//! This crate provides:
//! - The typed solver configuration (`solver.json`)
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Named presets for common tolerance/expansion trade-offs
//! - Semantic validation
//! - Config snapshots for reproducible solve output

pub mod preset;
pub mod resolve;
pub mod snapshot;
pub mod solver;
pub mod validate;

pub use preset::{get_preset, PresetName};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use solver::{ExpansionRule, SolverConfig};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
