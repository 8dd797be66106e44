//! Fuzz target for reference-data file parsing and validation.
//!
//! Arbitrary bytes must yield data or a `ValidationError`, never a panic.
//! Accepted data must survive a snapshot.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pdm_config::{ReferenceData, ReferencePath, ReferenceSnapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(reference) = ReferenceData::from_json(text) {
        let _ = ReferenceSnapshot::new(&reference, &ReferencePath::default());
    }
});
