//! Fuzz target for renderer settings.
//!
//! Anything `ReportConfig::from_json` accepts has passed validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pdm_report::ReportConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ReportConfig::from_json(text) {
        assert!(config.gauge_max_days > 0);
    }
});
