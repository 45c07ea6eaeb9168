//! Region explorer configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for problem.json and settings.json
//! - Settings resolution (CLI → env → XDG → /etc → defaults)
//! - Schema and semantic validation under a configurable policy
//! - Config snapshots embedded in analysis reports

pub mod problem;
pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use problem::{Problem, ProblemOrigin};
pub use resolve::{resolve_settings, ConfigSource, SettingsPath};
pub use settings::{DominanceMethod, Settings, ValidationMode, ValidationSettings};
pub use snapshot::ConfigSnapshot;
pub use validate::{ValidationError, ValidationResult, ValidationWarning};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
