//! Rounding helpers matching how the dashboard displays numbers.

/// Round half toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
pub fn js_round(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to a fixed number of decimals.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}

pub fn round2(x: f64) -> f64 {
    round_to(x, 2)
}

pub fn round4(x: f64) -> f64 {
    round_to(x, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_round_half_up() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(2.4999), 2.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(-2.6), -3.0);
        assert_eq!(js_round(0.0), 0.0);
    }

    #[test]
    fn test_js_round_non_finite() {
        assert!(js_round(f64::NAN).is_nan());
        assert_eq!(js_round(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round2(6.016), 6.02);
        assert_eq!(round4(0.052_345), 0.0523);
        assert_eq!(round_to(7.0, 2), 7.0);
    }
}
