//! Fuzz target for settings.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use np_config::validate::validate_settings;
use np_config::Settings;

fuzz_target!(|data: &[u8]| {
    if let Ok(settings) = serde_json::from_slice::<Settings>(data) {
        if validate_settings(&settings).is_ok() {
            let _ = settings.analysis_options();
        }
    }
});
