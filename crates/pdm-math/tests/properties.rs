//! Property-based tests for pdm-math.
//!
//! Uses proptest to verify the seeding and RUL guarantees hold across many
//! random inputs.

use proptest::prelude::*;
use pdm_math::{
    combined_rms, gauge_fill_pct, js_round, pseudo_random, rul_confidence_band, rul_days,
    rul_days_from_hours, MAX_RUL_DAYS,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// pseudo_random properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Draws stay in [0, 1).
    #[test]
    fn pseudo_random_in_unit_interval(seed in ".*") {
        let draw = pseudo_random(&seed);
        prop_assert!((0.0..1.0).contains(&draw), "draw({:?}) = {}", seed, draw);
    }

    /// Same seed, same draw.
    #[test]
    fn pseudo_random_deterministic(seed in "[A-Z0-9 -]{0,16}") {
        prop_assert_eq!(pseudo_random(&seed).to_bits(), pseudo_random(&seed).to_bits());
    }

    /// Draws are multiples of 1/1000.
    #[test]
    fn pseudo_random_three_decimals(seed in ".{0,32}") {
        let scaled = pseudo_random(&seed) * 1000.0;
        prop_assert!(approx_eq(scaled, scaled.round(), TOL));
    }
}

// ============================================================================
// RUL properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Days never drop below one.
    #[test]
    fn rul_days_at_least_one(limit in 6.0..9.6f64, rms in 0.0..12.0f64, slope in 0.0001..1.0f64) {
        let days = rul_days(limit, rms, slope).unwrap();
        prop_assert!(days >= 1);
    }

    /// A steeper trend never lengthens the RUL.
    #[test]
    fn rul_days_monotone_in_slope(
        rms in 5.0..8.0f64,
        slope in 0.01..0.09f64,
        bump in 0.0001..0.05f64,
    ) {
        let flat = rul_days(8.0, rms, slope).unwrap();
        let steep = rul_days(8.0, rms, slope + bump).unwrap();
        prop_assert!(steep <= flat, "slope {} -> {} days, slope {} -> {} days", slope, flat, slope + bump, steep);
    }

    /// Doubling a shallow trend moves the estimate by more than a day, so
    /// the day count drops. Both estimates stay above the one-day floor.
    #[test]
    fn rul_days_strict_when_hours_separate(rms in 5.0..6.0f64, slope in 0.01..0.02f64) {
        let steeper = slope * 2.0;
        let flat = rul_days(8.0, rms, slope).unwrap();
        let steep = rul_days(8.0, rms, steeper).unwrap();
        prop_assert!(steep >= 2, "steeper trend hit the floor: {} days", steep);
        prop_assert!(steep < flat, "slope {} -> {} days, slope {} -> {} days", slope, flat, steeper, steep);
    }

    /// The band brackets the estimate and stays >= 1.
    #[test]
    fn confidence_band_brackets(days in 1u32..10_000, draw in 0.0..1.0f64) {
        let [low, high] = rul_confidence_band(days, draw);
        prop_assert!(low >= 1);
        prop_assert!(low <= days && days <= high, "[{}, {}] vs {}", low, high, days);
        prop_assert!(high > days);
    }

    /// Day conversion agrees with rounding hours/24.
    #[test]
    fn days_from_hours_matches_rounding(hours in 48.0..100_000.0f64) {
        prop_assert_eq!(f64::from(rul_days_from_hours(hours)), js_round(hours / 24.0));
    }

    /// RMS of identical axes is the axis value.
    #[test]
    fn rms_of_equal_axes(v in 0.0..20.0f64) {
        prop_assert!(approx_eq(combined_rms(v, v, v), v, TOL));
    }

    /// Gauge fill is a percentage.
    #[test]
    fn gauge_fill_bounded(days in 0u32..100_000) {
        let pct = gauge_fill_pct(days, MAX_RUL_DAYS);
        prop_assert!((0.0..=100.0).contains(&pct));
    }
}
