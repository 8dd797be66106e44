//! Override slider schema: ranges, defaults and labels.

use pdm_common::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Note shown under the XGBoost overrides.
pub const XGB_OVERRIDE_NOTE: &str = "Risk band thresholds can be adjusted in site policy settings.";

/// Slack for comparing slider values against their bounds.
const RANGE_EPSILON: f64 = 1e-9;

fn default_true() -> bool {
    true
}

/// One adjustable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverrideParam {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    #[serde(default)]
    pub units: String,
    pub label: String,
    pub tooltip: String,
    /// Disabled parameters are shown but never recompute anything.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl OverrideParam {
    /// Whether `value` lies in `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite()
            && value >= self.min - RANGE_EPSILON
            && value <= self.max + RANGE_EPSILON
    }

    /// Accept `value` for parameter `name` or explain why not.
    pub fn validate(&self, name: &str, value: f64) -> Result<f64> {
        if !self.enabled {
            return Err(Error::OverrideDisabled {
                name: name.to_string(),
            });
        }
        if !self.contains(value) {
            return Err(Error::OverrideOutOfRange {
                name: name.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }

    /// Slider fill position of `value`, in percent of the range.
    pub fn position_pct(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span * 100.0).clamp(0.0, 100.0)
    }

    /// Decimals used when displaying a value of this parameter.
    pub fn display_decimals(&self) -> usize {
        if self.step < 0.1 {
            2
        } else {
            1
        }
    }
}

/// All override parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverrideSchema {
    #[serde(rename = "limit_L_mm_s")]
    pub limit_l_mm_s: OverrideParam,
    pub trend_window_h: OverrideParam,
    pub ewma_alpha: OverrideParam,
    pub rf_degrading_threshold: OverrideParam,
    pub rf_failure_threshold: OverrideParam,
}

impl OverrideSchema {
    pub const LIMIT: &'static str = "limit_L_mm_s";
    pub const TREND_WINDOW: &'static str = "trend_window_h";
    pub const EWMA_ALPHA: &'static str = "ewma_alpha";
    pub const RF_DEGRADING: &'static str = "rf_degrading_threshold";
    pub const RF_FAILURE: &'static str = "rf_failure_threshold";

    pub fn builtin() -> Self {
        let param = |min: f64,
                     max: f64,
                     default: f64,
                     step: f64,
                     units: &str,
                     label: &str,
                     tooltip: &str,
                     enabled: bool| OverrideParam {
            min,
            max,
            default,
            step,
            units: units.to_string(),
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            enabled,
        };

        OverrideSchema {
            limit_l_mm_s: param(
                6.0,
                9.6,
                8.0,
                0.1,
                "mm/s",
                "Vibration Limit (L)",
                "ISO 20816 zone B limit for pumps.",
                true,
            ),
            trend_window_h: param(
                6.0,
                168.0,
                24.0,
                6.0,
                "h",
                "Trend Window",
                "Longer window = smoother trend.",
                false,
            ),
            ewma_alpha: param(
                0.05,
                0.40,
                0.2,
                0.01,
                "",
                "EWMA Alpha",
                "Lower α filters noise.",
                true,
            ),
            rf_degrading_threshold: param(
                0.3,
                0.7,
                0.5,
                0.05,
                "",
                "Degrading Threshold",
                "Probability threshold for 'Degrading' state.",
                true,
            ),
            rf_failure_threshold: param(
                0.6,
                0.9,
                0.7,
                0.05,
                "",
                "Failure Threshold",
                "Probability threshold for 'Failure' state.",
                true,
            ),
        }
    }

    /// `(name, param)` in display order.
    pub fn iter(&self) -> [(&'static str, &OverrideParam); 5] {
        [
            (Self::LIMIT, &self.limit_l_mm_s),
            (Self::TREND_WINDOW, &self.trend_window_h),
            (Self::EWMA_ALPHA, &self.ewma_alpha),
            (Self::RF_DEGRADING, &self.rf_degrading_threshold),
            (Self::RF_FAILURE, &self.rf_failure_threshold),
        ]
    }

    pub fn get(&self, name: &str) -> Option<&OverrideParam> {
        self.iter()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let schema = OverrideSchema::builtin();
        assert_eq!(schema.limit_l_mm_s.default, 8.0);
        assert_eq!(schema.trend_window_h.default, 24.0);
        assert!(!schema.trend_window_h.enabled);
        assert_eq!(schema.rf_degrading_threshold.default, 0.5);
        assert_eq!(schema.rf_failure_threshold.default, 0.7);
    }

    #[test]
    fn test_contains_bounds_inclusive() {
        let limit = OverrideSchema::builtin().limit_l_mm_s;
        assert!(limit.contains(6.0));
        assert!(limit.contains(9.6));
        assert!(!limit.contains(5.9));
        assert!(!limit.contains(9.7));
        assert!(!limit.contains(f64::NAN));
    }

    #[test]
    fn test_validate_rejects_disabled() {
        let schema = OverrideSchema::builtin();
        let err = schema
            .trend_window_h
            .validate(OverrideSchema::TREND_WINDOW, 24.0)
            .unwrap_err();
        assert!(matches!(err, Error::OverrideDisabled { .. }));
    }

    #[test]
    fn test_validate_out_of_range() {
        let schema = OverrideSchema::builtin();
        let err = schema
            .limit_l_mm_s
            .validate(OverrideSchema::LIMIT, 12.0)
            .unwrap_err();
        assert!(matches!(err, Error::OverrideOutOfRange { max, .. } if max == 9.6));
        assert_eq!(
            schema.limit_l_mm_s.validate(OverrideSchema::LIMIT, 7.5).unwrap(),
            7.5
        );
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(OverrideSchema::builtin()).unwrap();
        assert!(json.get("limit_L_mm_s").is_some());
        assert_eq!(json["ewma_alpha"]["label"], "EWMA Alpha");
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let param: OverrideParam = serde_json::from_str(
            r#"{"min":0.0,"max":1.0,"default":0.5,"step":0.1,"label":"x","tooltip":"y"}"#,
        )
        .unwrap();
        assert!(param.enabled);
        assert_eq!(param.units, "");
    }

    #[test]
    fn test_position_and_decimals() {
        let schema = OverrideSchema::builtin();
        assert!((schema.rf_degrading_threshold.position_pct(0.5) - 50.0).abs() < 1e-9);
        assert_eq!(schema.limit_l_mm_s.position_pct(12.0), 100.0);
        assert_eq!(schema.ewma_alpha.display_decimals(), 2);
        assert_eq!(schema.limit_l_mm_s.display_decimals(), 1);
        assert_eq!(schema.get("ewma_alpha").unwrap().default, 0.2);
        assert!(schema.get("nope").is_none());
    }
}
