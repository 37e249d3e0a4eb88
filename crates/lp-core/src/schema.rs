//! JSON Schema generation for input and output documents.
//!
//! ```bash
//! lp-core schema --list
//! lp-core schema ModelDocument
//! lp-core schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::model::{
    HorizonSpec, ModelDocument, ObjectiveRewards, ObservationEntry, RewardEntry, RewardsSpec,
    TransitionEntry,
};
pub use crate::output::{
    AlphaVectorDoc, ModelSummary, PolicyDocument, RoundDoc, StatsDoc, ValueFunctionDoc,
};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Input
        ("ModelDocument", "Lexicographic POMDP model file"),
        ("TransitionEntry", "One P(successor | state, action) entry"),
        ("ObservationEntry", "One P(observation | successor, action) entry"),
        ("RewardsSpec", "Per-objective reward tables"),
        ("ObjectiveRewards", "Reward table of one objective"),
        ("RewardEntry", "One r(state, action) entry"),
        ("HorizonSpec", "Discount and optional step count"),
        // Output
        ("PolicyDocument", "Solve result with one value function per objective"),
        ("ModelSummary", "Model identity embedded in a policy document"),
        ("ValueFunctionDoc", "Alpha vectors of one objective"),
        ("AlphaVectorDoc", "One alpha vector with its action"),
        ("StatsDoc", "Calibration and round statistics"),
        ("RoundDoc", "Statistics of one expansion round"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "ModelDocument" => schema_for!(ModelDocument),
        "TransitionEntry" => schema_for!(TransitionEntry),
        "ObservationEntry" => schema_for!(ObservationEntry),
        "RewardsSpec" => schema_for!(RewardsSpec),
        "ObjectiveRewards" => schema_for!(ObjectiveRewards),
        "RewardEntry" => schema_for!(RewardEntry),
        "HorizonSpec" => schema_for!(HorizonSpec),
        "PolicyDocument" => schema_for!(PolicyDocument),
        "ModelSummary" => schema_for!(ModelSummary),
        "ValueFunctionDoc" => schema_for!(ValueFunctionDoc),
        "AlphaVectorDoc" => schema_for!(AlphaVectorDoc),
        "StatsDoc" => schema_for!(StatsDoc),
        "RoundDoc" => schema_for!(RoundDoc),
        _ => return None,
    };
    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    let mut schemas = BTreeMap::new();
    for (name, _desc) in available_schemas() {
        if let Some(schema) = generate_schema(name) {
            schemas.insert(name.to_string(), schema);
        }
    }
    schemas
}

/// Schema output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

/// Format a schema value for output.
pub fn format_schema(schema: &Value, format: SchemaFormat) -> Result<String, serde_json::Error> {
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(schema),
        SchemaFormat::JsonCompact => serde_json::to_string(schema),
    }
}
