//! Fuzz target for belief construction and belief arithmetic.
//!
//! Arbitrary weight vectors either fail to build a belief or build one whose
//! dot products and distances stay finite.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lp_core::BeliefState;

#[derive(Debug, Arbitrary)]
struct Input {
    weights: Vec<f64>,
    other: Vec<f64>,
    values: Vec<f64>,
    draw: f64,
}

fuzz_target!(|input: Input| {
    let Some(belief) = BeliefState::from_weights(&input.weights) else {
        return;
    };
    let mass: f64 = belief.support().map(|(_, p)| p).sum();
    assert!((mass - 1.0).abs() < 1e-6);

    if input.values.len() == belief.num_states() && input.values.iter().all(|v| v.is_finite()) {
        let bound = input.values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        if bound < 1e100 {
            assert!(belief.dot(&input.values).is_finite());
        }
    }

    if let Some(other) = BeliefState::from_weights(&input.other) {
        if other.num_states() == belief.num_states() {
            let d = belief.l1_distance(&other);
            assert!((0.0..=2.0 + 1e-9).contains(&d));
        }
    }

    if input.draw.is_finite() && (0.0..1.0).contains(&input.draw) {
        let _ = belief.sample(input.draw);
    }
});
