//! Configuration validation errors and semantic validation.

use np_math::MAX_REGION_OUTCOMES;
use serde::Serialize;
use thiserror::Error;

use crate::problem::Problem;
use crate::settings::{Settings, ValidationMode, ValidationSettings};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Length mismatch: null has {null} outcomes, alt has {alt}")]
    LengthMismatch { null: usize, alt: usize },

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SchemaError(_) => 62,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
            ValidationError::LengthMismatch { .. } => 67,
            ValidationError::InvalidDistribution(_) => 68,
        }
    }
}

impl From<ValidationError> for np_common::Error {
    fn from(err: ValidationError) -> Self {
        use np_common::Error;
        match err {
            ValidationError::IoError(msg) => Error::Io(std::io::Error::other(msg)),
            ValidationError::ParseError(msg) => Error::SchemaValidation(msg),
            ValidationError::SchemaError(msg) => Error::SchemaValidation(msg),
            ValidationError::SemanticError(msg) => Error::Config(msg),
            ValidationError::MissingField(field) => Error::MissingInput(field),
            ValidationError::InvalidValue { field, message } => {
                Error::InvalidSettings(format!("{}: {}", field, message))
            }
            ValidationError::VersionMismatch { expected, actual } => Error::SchemaValidation(
                format!("expected schema version {}, got {}", expected, actual),
            ),
            ValidationError::LengthMismatch { null, alt } => Error::LengthMismatch { null, alt },
            ValidationError::InvalidDistribution(msg) => Error::InvalidDistribution(msg),
        }
    }
}

/// A distribution problem tolerated under [`ValidationMode::Warn`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_schema_version(actual: &str) -> ValidationResult<()> {
    if actual != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    check_schema_version(&settings.schema_version)?;

    if settings.max_outcomes == 0 || settings.max_outcomes > MAX_REGION_OUTCOMES {
        return Err(ValidationError::InvalidValue {
            field: "max_outcomes".to_string(),
            message: format!(
                "Must be in [1, {}], got {}",
                MAX_REGION_OUTCOMES, settings.max_outcomes
            ),
        });
    }

    validate_tolerance("tie_tolerance", settings.tie_tolerance)?;
    validate_tolerance("validation.sum_tolerance", settings.validation.sum_tolerance)?;

    Ok(())
}

fn validate_tolerance(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite and non-negative, got {}", value),
        });
    }
    Ok(())
}

/// Validate a problem under the given policy.
///
/// Schema version and length mismatches are always errors. Distribution
/// problems (non-finite or negative entries, sums away from 1) are skipped,
/// returned as warnings, or turned into an error depending on `policy.mode`.
pub fn validate_problem(
    problem: &Problem,
    policy: &ValidationSettings,
) -> ValidationResult<Vec<ValidationWarning>> {
    check_schema_version(&problem.schema_version)?;

    if problem.null.len() != problem.alt.len() {
        return Err(ValidationError::LengthMismatch {
            null: problem.null.len(),
            alt: problem.alt.len(),
        });
    }

    if policy.mode == ValidationMode::Off {
        return Ok(Vec::new());
    }

    let mut findings = Vec::new();
    check_distribution("null", &problem.null, policy.sum_tolerance, &mut findings);
    check_distribution("alt", &problem.alt, policy.sum_tolerance, &mut findings);

    if policy.mode == ValidationMode::Strict && !findings.is_empty() {
        let joined = findings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ValidationError::InvalidDistribution(joined));
    }

    Ok(findings)
}

/// Collect distribution findings for one probability vector.
fn check_distribution(
    name: &str,
    probabilities: &[f64],
    sum_tolerance: f64,
    findings: &mut Vec<ValidationWarning>,
) {
    if probabilities.is_empty() {
        findings.push(ValidationWarning {
            field: name.to_string(),
            message: "has no outcomes".to_string(),
        });
        return;
    }

    let mut all_finite = true;
    for (i, &p) in probabilities.iter().enumerate() {
        if !p.is_finite() {
            all_finite = false;
            findings.push(ValidationWarning {
                field: format!("{}[{}]", name, i),
                message: format!("must be finite, got {}", p),
            });
        } else if p < 0.0 {
            findings.push(ValidationWarning {
                field: format!("{}[{}]", name, i),
                message: format!("must be non-negative, got {}", p),
            });
        }
    }

    // A sum over non-finite entries says nothing new.
    if all_finite {
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > sum_tolerance {
            findings.push(ValidationWarning {
                field: name.to_string(),
                message: format!("sums to {}, expected 1 (tolerance {})", sum, sum_tolerance),
            });
        }
    }
}
