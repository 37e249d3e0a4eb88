//! Fuzz target for model document loading.
//!
//! Tests that parsing and typed model construction handle arbitrary input
//! without panicking. Malformed documents must surface as `ModelError`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lp_core::{LexPomdp, ModelDocument};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(doc) = ModelDocument::from_json(text) {
        if let Ok(model) = LexPomdp::from_document(&doc) {
            // Every accepted model has normalized seed beliefs.
            for belief in model.initial_beliefs() {
                let mass: f64 = belief.support().map(|(_, p)| p).sum();
                assert!((mass - 1.0).abs() < 1e-6);
            }
        }
    }
});
