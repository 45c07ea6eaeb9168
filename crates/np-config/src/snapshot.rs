//! Configuration snapshots for reproducible reports.
//!
//! A snapshot captures the exact settings and problem that produced a
//! report, so two reports can be compared by hash alone.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::problem::{Problem, ProblemOrigin};
use crate::resolve::SettingsPath;
use crate::settings::{DominanceMethod, Settings, ValidationMode};

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// SHA-256 hash of the settings JSON content.
    #[serde(default)]
    pub settings_hash: Option<String>,

    /// Path where settings were loaded from.
    #[serde(default)]
    pub settings_path: Option<String>,

    /// Source of settings configuration.
    pub settings_source: String,

    /// SHA-256 hash of the problem (file content, or canonical JSON).
    pub problem_hash: String,

    /// Where the problem came from.
    pub problem_source: String,

    /// Combined hash of settings and problem (for quick comparison).
    pub combined_hash: String,

    /// Effective settings values.
    pub summary: SettingsSummary,
}

/// Effective values of the settings that shape an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SettingsSummary {
    pub max_outcomes: usize,
    pub tie_tolerance: f64,
    pub dominance: DominanceMethod,
    pub validation_mode: ValidationMode,
    pub sum_tolerance: f64,
}

impl From<&Settings> for SettingsSummary {
    fn from(settings: &Settings) -> Self {
        SettingsSummary {
            max_outcomes: settings.max_outcomes,
            tie_tolerance: settings.tie_tolerance,
            dominance: settings.dominance,
            validation_mode: settings.validation.mode,
            sum_tolerance: settings.validation.sum_tolerance,
        }
    }
}

impl ConfigSnapshot {
    /// Create a new snapshot from loaded configuration.
    ///
    /// `settings_json` and `problem_json` are the raw file contents when the
    /// values came from files; otherwise canonical JSON is hashed.
    pub fn new(
        settings: &Settings,
        settings_path: &SettingsPath,
        settings_json: Option<&str>,
        problem: &Problem,
        origin: &ProblemOrigin,
        problem_json: Option<&str>,
    ) -> Self {
        let settings_hash = settings_json.map(hash_content);
        let problem_hash = match problem_json {
            Some(raw) => hash_content(raw),
            None => hash_content(&problem.canonical_json()),
        };

        let combined = format!(
            "{}:{}",
            settings_hash.as_deref().unwrap_or("none"),
            problem_hash
        );

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            settings_hash,
            settings_path: settings_path.path.as_ref().map(|p| p.display().to_string()),
            settings_source: settings_path.source.to_string(),
            problem_hash,
            problem_source: origin.to_string(),
            combined_hash: hash_content(&combined),
            summary: SettingsSummary::from(settings),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same config and problem).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.combined_hash == other.combined_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.combined_hash[..12.min(self.combined_hash.len())]
    }
}

/// Hash content with SHA-256 and return hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
