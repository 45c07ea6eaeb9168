//! Core analysis modules.

pub mod region;
pub mod metrics;
pub mod dominance;
pub mod likelihood;
pub mod analysis;
