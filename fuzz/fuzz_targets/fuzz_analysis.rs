//! Fuzz target for analysis generation over arbitrary asset ids.
//!
//! Checks the invariants every analysis must hold and that the what-if
//! recalculation round-trips at the default limit.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pdm_common::ImportMode;
use pdm_config::OverrideSchema;
use pdm_core::analysis::AnalysisGenerator;
use pdm_core::WhatIf;

#[derive(Debug, Arbitrary)]
struct Input {
    asset: String,
    csv: bool,
    limit: f64,
}

fuzz_target!(|input: Input| {
    let mode = if input.csv { ImportMode::Csv } else { ImportMode::Phd };
    let Ok(result) = AnalysisGenerator::builtin().generate(&input.asset, mode) else {
        assert!(input.asset.trim().is_empty());
        return;
    };

    assert!(result.ci_brackets_rul());
    assert!(result
        .shap_summary
        .windows(2)
        .all(|w| w[0].phi >= w[1].phi));

    let schema = OverrideSchema::builtin();
    let mut what_if = WhatIf::from_result(&result, &schema).expect("generated panels carry inputs");
    let _ = what_if.set_limit(input.limit);
    what_if.reset();
    assert_eq!(what_if.rul_days(), result.rul_days);
});
