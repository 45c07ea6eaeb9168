//! JSON Schema generation for input files and provenance records.
//!
//! ```bash
//! np-core config schema            # list available types
//! np-core config schema Problem    # schema for one type
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use np_config::settings::ValidationSettings;
pub use np_config::snapshot::SettingsSummary;
pub use np_config::{ConfigSnapshot, DominanceMethod, Problem, Settings, ValidationMode};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Problem", "Null and alternative distributions over the outcomes"),
        ("Settings", "Analysis and validation settings (settings.json)"),
        ("ValidationSettings", "Distribution validation policy"),
        ("ValidationMode", "How distribution problems are treated"),
        ("DominanceMethod", "Dominance detection method"),
        (
            "ConfigSnapshot",
            "Hashes and summary of the inputs behind a report",
        ),
        ("SettingsSummary", "Effective settings recorded in a snapshot"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "Problem" => schema_for!(Problem),
        "Settings" => schema_for!(Settings),
        "ValidationSettings" => schema_for!(ValidationSettings),
        "ValidationMode" => schema_for!(ValidationMode),
        "DominanceMethod" => schema_for!(DominanceMethod),
        "ConfigSnapshot" => schema_for!(ConfigSnapshot),
        "SettingsSummary" => schema_for!(SettingsSummary),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            assert!(
                generate_schema(name).is_some(),
                "Schema for '{}' should generate",
                name
            );
        }
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("UnknownType").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn test_problem_schema_names_both_distributions() {
        let schema = generate_schema("Problem").unwrap();
        let props = &schema["properties"];
        assert!(props.get("null").is_some());
        assert!(props.get("alt").is_some());
    }

    #[test]
    fn test_generate_all_schemas() {
        let all = generate_all_schemas();
        assert_eq!(all.len(), available_schemas().len());
        assert!(all.contains_key("Settings"));
        assert!(all.contains_key("ConfigSnapshot"));
    }
}
