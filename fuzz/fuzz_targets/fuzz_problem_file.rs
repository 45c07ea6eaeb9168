//! Fuzz target for problem.json parsing and validation.
//!
//! Arbitrary bytes must only ever produce an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use np_config::settings::ValidationSettings;
use np_config::validate::validate_problem;
use np_config::{Problem, ValidationMode};

fuzz_target!(|data: &[u8]| {
    if let Ok(problem) = serde_json::from_slice::<Problem>(data) {
        for mode in [ValidationMode::Off, ValidationMode::Warn, ValidationMode::Strict] {
            let policy = ValidationSettings {
                mode,
                ..Default::default()
            };
            let _ = validate_problem(&problem, &policy);
        }
    }
});
