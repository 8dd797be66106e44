//! Override panel readout.
//!
//! The renderer never recalculates anything; callers pass the values they
//! computed and the renderer only lays them out.

use pdm_common::HealthState;
use pdm_config::OverrideParam;
use serde::{Deserialize, Serialize};

/// One slider as displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideControl {
    /// Schema key, e.g. `limit_L_mm_s`.
    pub name: String,
    pub param: OverrideParam,
    pub value: f64,
}

impl OverrideControl {
    pub fn new(name: impl Into<String>, param: &OverrideParam, value: f64) -> Self {
        Self {
            name: name.into(),
            param: param.clone(),
            value,
        }
    }

    /// Value with the slider's step precision, plus units.
    pub fn formatted(&self) -> String {
        let decimals = self.param.display_decimals();
        if self.param.units.is_empty() {
            format!("{:.*}", decimals, self.value)
        } else {
            format!("{:.*} {}", decimals, self.value, self.param.units)
        }
    }
}

/// Recalculated values for the explain-mode panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideReadout {
    /// Sliders of the RUL card (limit, trend window).
    pub rul_controls: Vec<OverrideControl>,
    /// Sliders of the Random Forest tab (degrading, failure).
    pub rf_controls: Vec<OverrideControl>,
    /// RUL under the current limit.
    pub rul_days: u32,
    pub rf_classification: HealthState,
    /// True when every slider sits at its default.
    pub is_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdm_config::OverrideSchema;

    #[test]
    fn test_formatted_uses_step_precision() {
        let schema = OverrideSchema::builtin();
        let limit = OverrideControl::new(OverrideSchema::LIMIT, &schema.limit_l_mm_s, 7.5);
        assert_eq!(limit.formatted(), "7.5 mm/s");

        let failure = OverrideControl::new(
            OverrideSchema::RF_FAILURE,
            &schema.rf_failure_threshold,
            0.6,
        );
        assert_eq!(failure.formatted(), "0.60");
    }
}
