//! Region Explorer Core Library
//!
//! This library provides the pieces behind the `np-core` binary:
//! - Exit codes for CLI operations
//! - Settings and problem loading
//! - The analysis pipeline and its JSON report
//! - Table, summary and JSONL renderers
//! - Structured logging
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod schema;
