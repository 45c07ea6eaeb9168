//! Error types for the region explorer.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Outcome Limit Exceeded
//!   Reason: too many outcomes: 30 exceeds the limit of 24
//!   Fix: Merge outcomes or raise max_outcomes in settings.json (hard limit 63).
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 30,
//!   "category": "analysis",
//!   "message": "too many outcomes: 30 exceeds the limit of 24",
//!   "recoverable": true,
//!   "suggested_action": "reduce_outcomes",
//!   "context": { "outcomes": 30, "max": 24 }
//! }
//! ```

use np_math::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for region explorer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings and problem file errors.
    Config,
    /// Malformed probability vectors or missing input.
    Input,
    /// Limits hit while enumerating or classifying regions.
    Analysis,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested actions for scripts reacting to errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation.
    Retry,
    /// Reset settings to defaults.
    ResetConfig,
    /// Run `np-core check` for details.
    RunCheck,
    /// Correct the null/alt vectors.
    FixInput,
    /// Use fewer outcomes or raise `max_outcomes`.
    ReduceOutcomes,
    /// Abort the operation.
    Abort,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::ReduceOutcomes => write!(f, "reduce_outcomes"),
            SuggestedAction::Abort => write!(f, "abort"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for the region explorer.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings file: {0}")]
    InvalidSettings(String),

    #[error("invalid problem file: {0}")]
    InvalidProblem(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    // Input errors (20-29)
    #[error("inputs have to be the same length: null has {null} outcomes, alt has {alt}")]
    LengthMismatch { null: usize, alt: usize },

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    // Analysis errors (30-39)
    #[error("too many outcomes: {outcomes} exceeds the limit of {max}")]
    TooManyOutcomes { outcomes: usize, max: usize },

    #[error("analysis failed: {0}")]
    Analysis(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AnalysisError> for Error {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::LengthMismatch { null, alt } => Error::LengthMismatch { null, alt },
            AnalysisError::TooManyOutcomes { outcomes, max } => {
                Error::TooManyOutcomes { outcomes, max }
            }
        }
    }
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Analysis errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSettings(_) => 11,
            Error::InvalidProblem(_) => 12,
            Error::SchemaValidation(_) => 13,
            Error::LengthMismatch { .. } => 20,
            Error::InvalidDistribution(_) => 21,
            Error::MissingInput(_) => 22,
            Error::TooManyOutcomes { .. } => 30,
            Error::Analysis(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidSettings(_)
            | Error::InvalidProblem(_)
            | Error::SchemaValidation(_) => ErrorCategory::Config,

            Error::LengthMismatch { .. } | Error::InvalidDistribution(_) | Error::MissingInput(_) => {
                ErrorCategory::Input
            }

            Error::TooManyOutcomes { .. } | Error::Analysis(_) => ErrorCategory::Analysis,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by changing
    /// the input or configuration and rerunning.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidSettings(_) => true,
            Error::InvalidProblem(_) => true,
            Error::SchemaValidation(_) => true,

            Error::LengthMismatch { .. } => true,
            Error::InvalidDistribution(_) => true,
            Error::MissingInput(_) => true,

            Error::TooManyOutcomes { .. } => true,
            // Internal failure, rerunning does not help
            Error::Analysis(_) => false,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns the suggested action for scripts.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) => SuggestedAction::RunCheck,
            Error::InvalidSettings(_) => SuggestedAction::ResetConfig,
            Error::InvalidProblem(_) => SuggestedAction::FixInput,
            Error::SchemaValidation(_) => SuggestedAction::RunCheck,

            Error::LengthMismatch { .. } => SuggestedAction::FixInput,
            Error::InvalidDistribution(_) => SuggestedAction::FixInput,
            Error::MissingInput(_) => SuggestedAction::FixInput,

            Error::TooManyOutcomes { .. } => SuggestedAction::ReduceOutcomes,
            Error::Analysis(_) => SuggestedAction::Abort,

            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'np-core config validate' to check configuration, or check syntax in settings.json."
            }
            Error::InvalidSettings(_) => {
                "Run 'np-core config show' to see the effective settings, or delete settings.json to use defaults."
            }
            Error::InvalidProblem(_) => {
                "Run 'np-core check --problem <file>' to see which fields are wrong."
            }
            Error::SchemaValidation(_) => {
                "Ensure the file matches the expected schema. Print it with 'np-core config schema'."
            }

            Error::LengthMismatch { .. } => {
                "Give null and alt one probability per outcome, in the same order."
            }
            Error::InvalidDistribution(_) => {
                "Probabilities must be finite, non-negative and sum to 1. Set validation.mode to 'warn' to continue anyway."
            }
            Error::MissingInput(_) => {
                "Pass --null and --alt, --problem <file>, or --demo."
            }

            Error::TooManyOutcomes { .. } => {
                "Merge outcomes or raise max_outcomes in settings.json (hard limit 63)."
            }
            Error::Analysis(_) => "Internal analysis failure. Report it with the input that triggered it.",

            Error::Io(_) => "Check that the file exists and is readable. Retry the operation.",
            Error::Json(_) => {
                "Invalid JSON in file. Check syntax with 'jq . <file>' or restore from backup."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidSettings(_) => "Invalid Settings",
            Error::InvalidProblem(_) => "Invalid Problem File",
            Error::SchemaValidation(_) => "Schema Validation Failed",

            Error::LengthMismatch { .. } => "Length Mismatch",
            Error::InvalidDistribution(_) => "Invalid Distribution",
            Error::MissingInput(_) => "Missing Input",

            Error::TooManyOutcomes { .. } => "Outcome Limit Exceeded",
            Error::Analysis(_) => "Analysis Error",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for scripts.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., outcome counts, file path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::LengthMismatch { null, alt } => {
                context.insert("null_len".to_string(), serde_json::json!(null));
                context.insert("alt_len".to_string(), serde_json::json!(alt));
            }
            Error::TooManyOutcomes { outcomes, max } => {
                context.insert("outcomes".to_string(), serde_json::json!(outcomes));
                context.insert("max".to_string(), serde_json::json!(max));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(Error::LengthMismatch { null: 3, alt: 2 }.code(), 20);
        assert_eq!(Error::TooManyOutcomes { outcomes: 30, max: 24 }.code(), 30);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            Error::InvalidSettings("bad".into()).category(),
            ErrorCategory::Config
        );
        assert_eq!(
            Error::MissingInput("null".into()).category(),
            ErrorCategory::Input
        );
        assert_eq!(
            Error::TooManyOutcomes { outcomes: 64, max: 63 }.category(),
            ErrorCategory::Analysis
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io).category(), ErrorCategory::Io);
    }

    #[test]
    fn test_codes_stay_in_category_ranges() {
        let errors = vec![
            Error::Config("x".into()),
            Error::InvalidSettings("x".into()),
            Error::InvalidProblem("x".into()),
            Error::SchemaValidation("x".into()),
            Error::LengthMismatch { null: 1, alt: 2 },
            Error::InvalidDistribution("x".into()),
            Error::MissingInput("x".into()),
            Error::TooManyOutcomes { outcomes: 2, max: 1 },
            Error::Analysis("x".into()),
        ];
        for err in errors {
            let range = match err.category() {
                ErrorCategory::Config => 10..20,
                ErrorCategory::Input => 20..30,
                ErrorCategory::Analysis => 30..40,
                ErrorCategory::Io => 60..70,
            };
            assert!(range.contains(&err.code()), "{:?} -> {}", err, err.code());
        }
    }

    #[test]
    fn test_from_analysis_error() {
        let err: Error = AnalysisError::LengthMismatch { null: 4, alt: 3 }.into();
        assert!(matches!(err, Error::LengthMismatch { null: 4, alt: 3 }));

        let err: Error = AnalysisError::TooManyOutcomes { outcomes: 40, max: 24 }.into();
        assert_eq!(err.code(), 30);
        assert_eq!(err.suggested_action(), SuggestedAction::ReduceOutcomes);
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::InvalidDistribution("sum".into()).is_recoverable());
        assert!(!Error::Analysis("boom".into()).is_recoverable());
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::TooManyOutcomes { outcomes: 30, max: 24 };
        let structured = StructuredError::from(&err);
        let json = structured.to_json();

        assert!(json.contains("\"code\":30"));
        assert!(json.contains("\"category\":\"analysis\""));
        assert!(json.contains("\"suggested_action\":\"reduce_outcomes\""));
        assert!(json.contains("\"outcomes\":30"));
    }

    #[test]
    fn test_structured_error_with_context() {
        let err = Error::InvalidProblem("null must not be empty".into());
        let structured = StructuredError::from(&err).with_context("file", "problem.json");

        assert_eq!(
            structured.context.get("file"),
            Some(&serde_json::json!("problem.json"))
        );
    }

    #[test]
    fn test_format_error_human_no_color() {
        let err = Error::LengthMismatch { null: 3, alt: 2 };
        let output = format_error_human(&err, false);

        assert!(output.contains("Length Mismatch"));
        assert!(output.contains("Reason: inputs have to be the same length"));
        assert!(output.contains("Fix:"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_format_error_human_color() {
        let err = Error::MissingInput("no distributions given".into());
        let output = format_error_human(&err, true);
        assert!(output.contains("\x1b[31m"));
    }

    #[test]
    fn test_display_matches_serde_names() {
        let action = SuggestedAction::ReduceOutcomes;
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, format!("\"{}\"", action));

        let category = ErrorCategory::Input;
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, format!("\"{}\"", category));
    }
}
