//! Small models shared by unit tests.

use serde_json::{json, Value};

use crate::model::{LexPomdp, ModelDocument};

pub fn build(value: Value) -> LexPomdp {
    let doc: ModelDocument = serde_json::from_value(value).expect("model document");
    LexPomdp::from_document(&doc).expect("valid model")
}

/// One state, one action, constant reward `r`. Converges to `r / (1 − γ)`.
pub fn constant(reward: f64, discount: f64) -> LexPomdp {
    build(json!({
        "name": "constant",
        "states": ["only"],
        "actions": ["wait"],
        "observations": ["nothing"],
        "transitions": [
            {"state": "only", "action": "wait", "successor": "only", "probability": 1.0}
        ],
        "observation_model": [
            {"action": "wait", "successor": "only", "observation": "nothing", "probability": 1.0}
        ],
        "rewards": [
            {"name": "income", "entries": [{"state": "only", "action": "wait", "reward": reward}]}
        ],
        "horizon": {"discount": discount},
        "initial_beliefs": [{"only": 1.0}]
    }))
}

/// Two doors, one hiding a tiger. Listening is 85% accurate; opening a door
/// resets the problem. Objective 0 is treasure, objective 1 penalizes noise.
pub fn tiger() -> LexPomdp {
    let mut transitions = Vec::new();
    let mut observations = Vec::new();
    for s in ["tiger-left", "tiger-right"] {
        transitions.push(json!({"state": s, "action": "listen", "successor": s, "probability": 1.0}));
        for a in ["open-left", "open-right"] {
            for s2 in ["tiger-left", "tiger-right"] {
                transitions.push(json!({"state": s, "action": a, "successor": s2, "probability": 0.5}));
            }
        }
    }
    for (s2, right, wrong) in [
        ("tiger-left", "hear-left", "hear-right"),
        ("tiger-right", "hear-right", "hear-left"),
    ] {
        observations.push(json!({"action": "listen", "successor": s2, "observation": right, "probability": 0.85}));
        observations.push(json!({"action": "listen", "successor": s2, "observation": wrong, "probability": 0.15}));
        for a in ["open-left", "open-right"] {
            for z in ["hear-left", "hear-right"] {
                observations.push(json!({"action": a, "successor": s2, "observation": z, "probability": 0.5}));
            }
        }
    }
    build(json!({
        "name": "tiger",
        "states": ["tiger-left", "tiger-right"],
        "actions": ["listen", "open-left", "open-right"],
        "observations": ["hear-left", "hear-right"],
        "transitions": transitions,
        "observation_model": observations,
        "rewards": [
            {"name": "treasure", "entries": [
                {"state": "tiger-left", "action": "listen", "reward": -1.0},
                {"state": "tiger-right", "action": "listen", "reward": -1.0},
                {"state": "tiger-left", "action": "open-left", "reward": -100.0},
                {"state": "tiger-left", "action": "open-right", "reward": 10.0},
                {"state": "tiger-right", "action": "open-left", "reward": 10.0},
                {"state": "tiger-right", "action": "open-right", "reward": -100.0}
            ]},
            {"name": "quiet", "entries": [
                {"state": "tiger-left", "action": "open-left", "reward": -1.0},
                {"state": "tiger-left", "action": "open-right", "reward": -1.0},
                {"state": "tiger-right", "action": "open-left", "reward": -1.0},
                {"state": "tiger-right", "action": "open-right", "reward": -1.0}
            ]}
        ],
        "horizon": {"discount": 0.95},
        "initial_beliefs": [
            {"tiger-left": 0.5, "tiger-right": 0.5},
            {"tiger-left": 0.9, "tiger-right": 0.1},
            {"tiger-left": 0.1, "tiger-right": 0.9}
        ]
    }))
}
