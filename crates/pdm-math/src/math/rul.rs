//! Remaining-useful-life arithmetic.
//!
//! RUL is a linear extrapolation of the vibration trend to the limit `L`:
//! `hours = (L - rms) / slope`, reported in whole days with a floor of one.
//! The generator and the what-if recalculation both go through
//! [`rul_days`], so the two paths cannot drift apart.

use serde::Serialize;

use super::round::js_round;

/// Upper end of the RUL gauge scale.
pub const MAX_RUL_DAYS: u32 = 120;

/// Hours per reported RUL day.
const HOURS_PER_DAY: f64 = 24.0;

/// Root mean square of the three vibration axes.
pub fn combined_rms(x: f64, y: f64, z: f64) -> f64 {
    ((x * x + y * y + z * z) / 3.0).sqrt()
}

/// Hours until `rms` reaches `limit` at `slope` mm/s per hour.
///
/// Returns `None` when the slope is not a positive finite number or the
/// inputs are not finite. Negative hours (already above the limit) are
/// returned as-is.
pub fn rul_hours(limit: f64, rms: f64, slope: f64) -> Option<f64> {
    if !(slope.is_finite() && slope > 0.0) || !limit.is_finite() || !rms.is_finite() {
        return None;
    }
    Some((limit - rms) / slope)
}

/// Whole days from hours: `max(1, round(hours / 24))`.
pub fn rul_days_from_hours(hours: f64) -> u32 {
    let days = js_round(hours / HOURS_PER_DAY);
    if days <= 1.0 {
        1
    } else if days >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        days as u32
    }
}

/// Whole-day RUL for a limit, RMS level and trend.
pub fn rul_days(limit: f64, rms: f64, slope: f64) -> Option<u32> {
    rul_hours(limit, rms, slope).map(rul_days_from_hours)
}

/// Illustrative asymmetric band around `days`:
/// `[max(1, d - round(draw*3)), d + round(draw*4) + 1]`.
pub fn rul_confidence_band(days: u32, draw: f64) -> [u32; 2] {
    let below = js_round(draw * 3.0).max(0.0) as u32;
    let above = js_round(draw * 4.0).max(0.0) as u32;
    let low = days.saturating_sub(below).max(1);
    let high = days.saturating_add(above).saturating_add(1);
    [low, high]
}

/// Gauge fill in percent, capped at 100.
pub fn gauge_fill_pct(days: u32, max_days: u32) -> f64 {
    if max_days == 0 {
        return 100.0;
    }
    (f64::from(days) / f64::from(max_days) * 100.0).min(100.0)
}

/// RUL in both units, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RulEstimate {
    pub hours: f64,
    pub days: u32,
}

impl RulEstimate {
    pub fn compute(limit: f64, rms: f64, slope: f64) -> Option<Self> {
        let hours = rul_hours(limit, rms, slope)?;
        Some(Self {
            hours,
            days: rul_days_from_hours(hours),
        })
    }

    /// Hours rounded for display.
    pub fn whole_hours(&self) -> i64 {
        js_round(self.hours) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_rms() {
        assert!((combined_rms(3.0, 3.0, 3.0) - 3.0).abs() < 1e-12);
        assert!((combined_rms(1.0, 2.0, 2.0) - 3.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_rul_hours_rejects_bad_slope() {
        assert_eq!(rul_hours(8.0, 6.0, 0.0), None);
        assert_eq!(rul_hours(8.0, 6.0, -0.01), None);
        assert_eq!(rul_hours(8.0, 6.0, f64::NAN), None);
        assert_eq!(rul_hours(8.0, f64::INFINITY, 0.01), None);
    }

    #[test]
    fn test_rul_days_floor_of_one() {
        // Already above the limit.
        assert_eq!(rul_days(8.0, 9.0, 0.05), Some(1));
        // 2 / 0.05 = 40 h -> 1.67 d -> 2
        assert_eq!(rul_days(8.0, 6.0, 0.05), Some(2));
        // 11 h rounds to 0 days, floored to 1
        assert_eq!(rul_days(8.0, 7.89, 0.01), Some(1));
    }

    #[test]
    fn test_rul_days_rounds_half_up() {
        // 36 h = 1.5 d -> 2
        assert_eq!(rul_days_from_hours(36.0), 2);
        assert_eq!(rul_days_from_hours(35.9), 1);
        assert_eq!(rul_days_from_hours(240.0), 10);
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(rul_confidence_band(10, 0.0), [10, 11]);
        // round(0.5*3)=2, round(0.5*4)=2
        assert_eq!(rul_confidence_band(10, 0.5), [8, 13]);
        assert_eq!(rul_confidence_band(1, 0.999), [1, 6]);
    }

    #[test]
    fn test_gauge_fill_pct() {
        assert_eq!(gauge_fill_pct(60, MAX_RUL_DAYS), 50.0);
        assert_eq!(gauge_fill_pct(500, MAX_RUL_DAYS), 100.0);
        assert_eq!(gauge_fill_pct(0, 0), 100.0);
    }

    #[test]
    fn test_estimate_whole_hours() {
        let est = RulEstimate::compute(8.0, 6.0, 0.05).unwrap();
        assert_eq!(est.whole_hours(), 40);
        assert_eq!(est.days, 2);
    }
}
