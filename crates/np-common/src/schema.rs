//! Schema versioning for machine-readable output.

/// Version of the JSON report layout. Bumped on breaking field changes.
pub const SCHEMA_VERSION: &str = "1.0.0";
