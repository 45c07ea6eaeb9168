//! Configuration loading for np-core.
//!
//! This module handles:
//! - Resolving settings.json (CLI > env > XDG > /etc > defaults)
//! - Loading the problem from a file, inline vectors, or the demo
//! - Keeping raw file content around for snapshot hashing

pub use np_config::problem::parse_probabilities;
pub use np_config::validate::ValidationError;
pub use np_config::{
    ConfigSnapshot, ConfigSource, DominanceMethod, Problem, ProblemOrigin, Settings, SettingsPath,
};

use np_config::resolve::{resolve_settings_in, SearchRoots};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid inline distribution: {0}")]
    InvalidInput(ValidationError),

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl From<ConfigError> for np_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => np_common::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )),
            ConfigError::ParseError { path, source } => np_common::Error::SchemaValidation(
                format!("{}: {}", path.display(), source),
            ),
            ConfigError::IoError { source, .. } => np_common::Error::Io(source),
            ConfigError::InvalidInput(v) => np_common::Error::InvalidDistribution(v.to_string()),
            ConfigError::ValidationError(v) => v.into(),
        }
    }
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config directory (replaces NP_CONFIG_DIR).
    pub config_dir: Option<PathBuf>,
    /// Explicit settings file path.
    pub settings_path: Option<PathBuf>,
}

/// Loaded settings with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    pub path: SettingsPath,
    /// Raw file content (None if using defaults).
    pub raw: Option<String>,
}

/// Loaded problem with provenance information.
#[derive(Debug, Clone)]
pub struct LoadedProblem {
    pub problem: Problem,
    pub origin: ProblemOrigin,
    /// Raw file content (None unless loaded from a file).
    pub raw: Option<String>,
}

/// Where to take the problem from.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemInput {
    /// Comma-separated vectors given on the command line.
    Inline { null: String, alt: String },
    File(PathBuf),
    Demo,
}

/// Resolve and load settings.
///
/// Parsing happens here; semantic validation is left to the pipeline so it
/// can be reported under the validate stage.
pub fn load_settings(options: &ConfigOptions) -> Result<ResolvedSettings, ConfigError> {
    let mut roots = SearchRoots::from_env();
    if let Some(dir) = &options.config_dir {
        roots.config_dir_env = Some(dir.clone());
    }

    let path = resolve_settings_in(options.settings_path.as_deref(), &roots);

    match path.path.clone() {
        Some(file) => {
            let raw = read_file(&file)?;
            let settings: Settings =
                serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
                    path: file.clone(),
                    source,
                })?;
            Ok(ResolvedSettings {
                settings,
                path,
                raw: Some(raw),
            })
        }
        None => Ok(ResolvedSettings {
            settings: Settings::default(),
            path,
            raw: None,
        }),
    }
}

/// Load the problem described by `input`.
pub fn load_problem(input: &ProblemInput) -> Result<LoadedProblem, ConfigError> {
    match input {
        ProblemInput::Inline { null, alt } => {
            let problem = Problem::new(
                parse_probabilities("null", null).map_err(ConfigError::InvalidInput)?,
                parse_probabilities("alt", alt).map_err(ConfigError::InvalidInput)?,
            );
            Ok(LoadedProblem {
                problem,
                origin: ProblemOrigin::Inline,
                raw: None,
            })
        }
        ProblemInput::File(path) => {
            let raw = read_file(path)?;
            let problem: Problem =
                serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
                    path: path.clone(),
                    source,
                })?;
            Ok(LoadedProblem {
                problem,
                origin: ProblemOrigin::File(path.clone()),
                raw: Some(raw),
            })
        }
        ProblemInput::Demo => Ok(LoadedProblem {
            problem: Problem::demo(),
            origin: ProblemOrigin::Demo,
            raw: None,
        }),
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}
