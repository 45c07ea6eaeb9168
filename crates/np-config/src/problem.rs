//! Testing problem definition: a null and an alternative distribution over
//! the same finite outcome space.
//!
//! These types match the problem.json layout.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validate::ValidationError;

/// A pair of distributions to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Problem {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Short name shown in report headers.
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Probability of each outcome under H0.
    pub null: Vec<f64>,

    /// Probability of each outcome under H1.
    pub alt: Vec<f64>,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

/// Where a problem came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemOrigin {
    /// Loaded from a problem.json file.
    File(PathBuf),
    /// Given on the command line.
    Inline,
    /// The built-in demonstration problem.
    Demo,
}

impl std::fmt::Display for ProblemOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemOrigin::File(path) => write!(f, "file {}", path.display()),
            ProblemOrigin::Inline => write!(f, "inline"),
            ProblemOrigin::Demo => write!(f, "demo"),
        }
    }
}

impl Problem {
    /// Build a problem from two probability vectors.
    pub fn new(null: Vec<f64>, alt: Vec<f64>) -> Self {
        Problem {
            schema_version: default_schema_version(),
            label: None,
            description: None,
            null,
            alt,
        }
    }

    /// Four outcomes with a two-way likelihood ratio tie between outcomes
    /// 0 and 1, and a unit ratio on outcome 3.
    pub fn demo() -> Self {
        Problem {
            schema_version: default_schema_version(),
            label: Some("demo".to_string()),
            description: Some("Four outcomes; outcomes 0 and 1 share the ratio 3".to_string()),
            null: vec![0.1, 0.05, 0.7, 0.15],
            alt: vec![0.3, 0.15, 0.4, 0.15],
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Number of outcomes, taken from the null distribution.
    pub fn outcomes(&self) -> usize {
        self.null.len()
    }

    /// Load a problem from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse a problem from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Canonical JSON used for hashing problems that did not come from a file.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Parse a comma-separated list of probabilities such as `0.1,0.2,0.7`.
pub fn parse_probabilities(field: &str, raw: &str) -> Result<Vec<f64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .enumerate()
        .map(|(i, part)| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| ValidationError::InvalidValue {
                    field: format!("{}[{}]", field, i),
                    message: format!("'{}' is not a number: {}", part.trim(), e),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_problem() {
        let json = r#"{ "null": [0.5, 0.5], "alt": [0.9, 0.1] }"#;
        let problem = Problem::from_json(json).unwrap();
        assert_eq!(problem.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert_eq!(problem.outcomes(), 2);
        assert!(problem.label.is_none());
    }

    #[test]
    fn test_parse_full_problem() {
        let json = r#"{
            "schema_version": "1.0.0",
            "label": "coin",
            "description": "fair vs biased",
            "null": [0.5, 0.5],
            "alt": [0.9, 0.1]
        }"#;
        let problem = Problem::from_json(json).unwrap();
        assert_eq!(problem.label.as_deref(), Some("coin"));
        assert_eq!(problem.alt, vec![0.9, 0.1]);
    }

    #[test]
    fn test_missing_alt_is_parse_error() {
        let err = Problem::from_json(r#"{ "null": [1.0] }"#).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_demo_problem() {
        let demo = Problem::demo();
        assert_eq!(demo.outcomes(), 4);
        assert_eq!(demo.alt.len(), 4);
        let sum: f64 = demo.null.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_probabilities() {
        assert_eq!(
            parse_probabilities("null", "0.1, 0.2,0.7").unwrap(),
            vec![0.1, 0.2, 0.7]
        );
        assert!(parse_probabilities("null", "").unwrap().is_empty());

        let err = parse_probabilities("alt", "0.1,x").unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "alt[1]"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_canonical_json_is_stable() {
        assert_eq!(
            Problem::demo().canonical_json(),
            Problem::demo().canonical_json()
        );
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(ProblemOrigin::Demo.to_string(), "demo");
        assert_eq!(ProblemOrigin::Inline.to_string(), "inline");
        assert_eq!(
            ProblemOrigin::File(PathBuf::from("p.json")).to_string(),
            "file p.json"
        );
    }
}
