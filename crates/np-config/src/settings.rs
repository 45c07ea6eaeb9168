//! Analysis settings (settings.json).
//!
//! Every field has a default, so an empty object `{}` is a valid file.

use np_math::{AnalysisOptions, DominanceStrategy, DEFAULT_MAX_OUTCOMES, DEFAULT_TIE_TOLERANCE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::validate::ValidationError;

/// Default tolerance for a distribution's sum to differ from 1.
pub const DEFAULT_SUM_TOLERANCE: f64 = 1e-9;

/// Complete settings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    pub schema_version: String,

    /// Largest outcome count accepted before enumeration (at most 63).
    pub max_outcomes: usize,

    /// Relative tolerance under which two likelihood ratios tie.
    pub tie_tolerance: f64,

    pub dominance: DominanceMethod,

    pub validation: ValidationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            max_outcomes: DEFAULT_MAX_OUTCOMES,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
            dominance: DominanceMethod::default(),
            validation: ValidationSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Options handed to the analysis engine.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions::default()
            .with_dominance(self.dominance.into())
            .with_tie_tolerance(self.tie_tolerance)
            .with_max_outcomes(self.max_outcomes)
    }
}

/// Dominance detection method as spelled in settings files and on the CLI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DominanceMethod {
    /// Sort-and-sweep over the frontier, O(R log R).
    #[default]
    FrontierSweep,
    /// Compare every pair, O(R^2).
    Pairwise,
}

impl From<DominanceMethod> for DominanceStrategy {
    fn from(method: DominanceMethod) -> Self {
        match method {
            DominanceMethod::FrontierSweep => DominanceStrategy::FrontierSweep,
            DominanceMethod::Pairwise => DominanceStrategy::Pairwise,
        }
    }
}

impl std::fmt::Display for DominanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DominanceMethod::FrontierSweep => write!(f, "frontier_sweep"),
            DominanceMethod::Pairwise => write!(f, "pairwise"),
        }
    }
}

impl FromStr for DominanceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "frontier_sweep" | "sweep" => Ok(DominanceMethod::FrontierSweep),
            "pairwise" => Ok(DominanceMethod::Pairwise),
            other => Err(format!(
                "unknown dominance method '{}' (expected frontier_sweep or pairwise)",
                other
            )),
        }
    }
}

/// How distribution problems found in a problem are treated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Skip distribution checks entirely.
    Off,
    /// Report problems as warnings and continue.
    #[default]
    Warn,
    /// Reject the problem.
    Strict,
}

impl std::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationMode::Off => write!(f, "off"),
            ValidationMode::Warn => write!(f, "warn"),
            ValidationMode::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(ValidationMode::Off),
            "warn" => Ok(ValidationMode::Warn),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(format!(
                "unknown validation mode '{}' (expected off, warn or strict)",
                other
            )),
        }
    }
}

/// Distribution validation policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ValidationSettings {
    pub mode: ValidationMode,

    /// Allowed absolute distance of each distribution's sum from 1.
    pub sum_tolerance: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        ValidationSettings {
            mode: ValidationMode::default(),
            sum_tolerance: DEFAULT_SUM_TOLERANCE,
        }
    }
}
