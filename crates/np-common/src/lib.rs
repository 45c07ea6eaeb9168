//! Neyman-Pearson region explorer common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The unified error type with stable codes
//! - Output format specifications
//! - The report schema version

pub mod error;
pub mod output;
pub mod schema;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
