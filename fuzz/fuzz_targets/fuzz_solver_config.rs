//! Fuzz target for solver.json configuration parsing.
//!
//! Tests that JSON solver configuration parsing and validation handle
//! arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lp_config::validate::validate_solver_config;
use lp_config::SolverConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<SolverConfig>(data) {
        let _ = validate_solver_config(&config);
        let _ = config.expansion_rule();
    }
});
