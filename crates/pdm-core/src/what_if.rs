//! Live override recalculation.
//!
//! A [`WhatIf`] captures the RMS and slope recorded on an analysis's RUL
//! panel and the Random Forest vote shares, then recomputes the day count,
//! gauge fill and RF class as the user moves the sliders. The analysis
//! itself is never touched, so resetting to defaults reproduces exactly what
//! was displayed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use pdm_common::{AnalysisResult, AssetId, Error, HealthState, Result, RfVotes, RulInputs};
use pdm_config::OverrideSchema;
use pdm_math::{gauge_fill_pct, rul_days, MAX_RUL_DAYS};

use crate::logging::event_names;

const LIMIT_TOLERANCE: f64 = 1e-9;

/// Current slider positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverrideValues {
    #[serde(rename = "limit_L_mm_s")]
    pub limit_l_mm_s: f64,
    pub trend_window_h: f64,
    pub ewma_alpha: f64,
    pub rf_degrading_threshold: f64,
    pub rf_failure_threshold: f64,
}

impl OverrideValues {
    pub fn defaults(schema: &OverrideSchema) -> Self {
        OverrideValues {
            limit_l_mm_s: schema.limit_l_mm_s.default,
            trend_window_h: schema.trend_window_h.default,
            ewma_alpha: schema.ewma_alpha.default,
            rf_degrading_threshold: schema.rf_degrading_threshold.default,
            rf_failure_threshold: schema.rf_failure_threshold.default,
        }
    }

    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            OverrideSchema::LIMIT => Some(self.limit_l_mm_s),
            OverrideSchema::TREND_WINDOW => Some(self.trend_window_h),
            OverrideSchema::EWMA_ALPHA => Some(self.ewma_alpha),
            OverrideSchema::RF_DEGRADING => Some(self.rf_degrading_threshold),
            OverrideSchema::RF_FAILURE => Some(self.rf_failure_threshold),
            _ => None,
        }
    }
}

/// Recalculation session over one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIf {
    asset_id: AssetId,
    schema: OverrideSchema,
    inputs: RulInputs,
    votes: RfVotes,
    displayed_rul_days: u32,
    values: OverrideValues,
}

impl WhatIf {
    /// Capture the recalculation inputs of `result`.
    ///
    /// Fails with [`Error::AnalysisFailed`] when the RUL or RF panel lacks
    /// its captured inputs, and with [`Error::Config`] when the schema's
    /// default limit is not the limit the analysis was computed with.
    pub fn from_result(result: &AnalysisResult, schema: &OverrideSchema) -> Result<Self> {
        let inputs = result.explain_panel.rul_inputs.ok_or_else(|| {
            Error::AnalysisFailed("RUL panel carries no captured inputs".to_string())
        })?;
        let default_limit = schema.limit_l_mm_s.default;
        if (default_limit - inputs.limit).abs() > LIMIT_TOLERANCE {
            return Err(Error::Config(format!(
                "default limit {default_limit} mm/s differs from the analysis limit {} mm/s",
                inputs.limit
            )));
        }
        let votes = result.rf_explain_panel.rf_votes.ok_or_else(|| {
            Error::AnalysisFailed("Random Forest panel carries no vote shares".to_string())
        })?;
        if rul_days(schema.limit_l_mm_s.default, inputs.rms, inputs.slope).is_none() {
            return Err(Error::AnalysisFailed(format!(
                "captured trend {} cannot be extrapolated",
                inputs.slope
            )));
        }

        Ok(WhatIf {
            asset_id: result.asset_id.clone(),
            schema: schema.clone(),
            inputs,
            votes,
            displayed_rul_days: result.rul_days,
            values: OverrideValues::defaults(schema),
        })
    }

    pub fn values(&self) -> &OverrideValues {
        &self.values
    }

    pub fn schema(&self) -> &OverrideSchema {
        &self.schema
    }

    pub fn inputs(&self) -> &RulInputs {
        &self.inputs
    }

    /// Move the vibration-limit slider.
    pub fn set_limit(&mut self, limit: f64) -> Result<()> {
        let limit = self.schema.limit_l_mm_s.validate(OverrideSchema::LIMIT, limit)?;
        self.values.limit_l_mm_s = limit;
        self.log_applied(OverrideSchema::LIMIT, limit);
        Ok(())
    }

    /// Always rejected: the trend window is display-only.
    pub fn set_trend_window(&mut self, hours: f64) -> Result<()> {
        let hours = self
            .schema
            .trend_window_h
            .validate(OverrideSchema::TREND_WINDOW, hours)?;
        self.values.trend_window_h = hours;
        Ok(())
    }

    /// Move both Random Forest sliders; `degrading` must not exceed `failure`.
    pub fn set_rf_thresholds(&mut self, degrading: f64, failure: f64) -> Result<()> {
        let degrading = self
            .schema
            .rf_degrading_threshold
            .validate(OverrideSchema::RF_DEGRADING, degrading)?;
        let failure = self
            .schema
            .rf_failure_threshold
            .validate(OverrideSchema::RF_FAILURE, failure)?;
        if degrading > failure {
            return Err(Error::InvalidInput(format!(
                "degrading threshold {degrading} exceeds failure threshold {failure}"
            )));
        }
        self.values.rf_degrading_threshold = degrading;
        self.values.rf_failure_threshold = failure;
        self.log_applied(OverrideSchema::RF_DEGRADING, degrading);
        self.log_applied(OverrideSchema::RF_FAILURE, failure);
        Ok(())
    }

    /// Restore every slider to its default.
    pub fn reset(&mut self) {
        self.values = OverrideValues::defaults(&self.schema);
    }

    pub fn is_default(&self) -> bool {
        self.values == OverrideValues::defaults(&self.schema)
    }

    /// RUL in days at the current limit.
    pub fn rul_days(&self) -> u32 {
        rul_days(self.values.limit_l_mm_s, self.inputs.rms, self.inputs.slope)
            .unwrap_or(self.displayed_rul_days)
    }

    /// RUL as shown by the stored analysis.
    pub fn displayed_rul_days(&self) -> u32 {
        self.displayed_rul_days
    }

    pub fn gauge_fill_pct(&self) -> f64 {
        gauge_fill_pct(self.rul_days(), MAX_RUL_DAYS)
    }

    pub fn votes(&self) -> &RfVotes {
        &self.votes
    }

    /// Random Forest class under the current thresholds.
    ///
    /// Failure when the failure share reaches its threshold; otherwise
    /// Degrading when the degrading and failure shares together reach the
    /// degrading threshold.
    pub fn rf_classification(&self) -> HealthState {
        if self.votes.failure >= self.values.rf_failure_threshold {
            HealthState::Failure
        } else if self.votes.degrading + self.votes.failure >= self.values.rf_degrading_threshold {
            HealthState::Degrading
        } else {
            HealthState::Healthy
        }
    }

    /// Serializable snapshot of the recalculated values.
    pub fn outcome(&self) -> WhatIfOutcome {
        WhatIfOutcome {
            asset_id: self.asset_id.clone(),
            overrides: self.values,
            displayed_rul_days: self.displayed_rul_days,
            rul_days: self.rul_days(),
            gauge_fill_pct: self.gauge_fill_pct(),
            rf_classification: self.rf_classification(),
            is_default: self.is_default(),
        }
    }

    fn log_applied(&self, name: &str, value: f64) {
        tracing::info!(
            target: event_names::OVERRIDE_APPLIED,
            asset = %self.asset_id,
            stage = "override",
            parameter = name,
            value,
            rul_days = self.rul_days(),
            "override applied"
        );
    }
}

/// What-if results as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WhatIfOutcome {
    pub asset_id: AssetId,
    pub overrides: OverrideValues,
    pub displayed_rul_days: u32,
    pub rul_days: u32,
    pub gauge_fill_pct: f64,
    pub rf_classification: HealthState,
    pub is_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisGenerator;
    use pdm_common::ImportMode;

    fn what_if(asset: &str) -> (AnalysisResult, WhatIf) {
        let result = AnalysisGenerator::builtin()
            .generate(asset, ImportMode::Phd)
            .unwrap();
        let w = WhatIf::from_result(&result, &OverrideSchema::builtin()).unwrap();
        (result, w)
    }

    #[test]
    fn test_default_limit_reproduces_displayed_rul() {
        for id in ["99 P-02", "99 P-11", "SEU3-P-10", "PDA-P-01", "PDU-P-08"] {
            let (result, w) = what_if(id);
            assert_eq!(w.rul_days(), result.rul_days, "{id}");
        }
    }

    #[test]
    fn test_limit_change_is_reversible() {
        let (result, mut w) = what_if("99 C-02");
        w.set_limit(9.6).unwrap();
        assert!(w.rul_days() >= result.rul_days);
        assert!(!w.is_default());

        w.set_limit(8.0).unwrap();
        assert_eq!(w.rul_days(), result.rul_days);

        w.set_limit(6.0).unwrap();
        w.reset();
        assert_eq!(w.rul_days(), result.rul_days);
        assert!(w.is_default());
    }

    #[test]
    fn test_result_not_mutated() {
        let (result, mut w) = what_if("99 P-02");
        let before = result.clone();
        w.set_limit(9.0).unwrap();
        assert_eq!(result, before);
    }

    #[test]
    fn test_limit_out_of_range() {
        let (_, mut w) = what_if("99 P-02");
        let err = w.set_limit(12.0).unwrap_err();
        assert!(matches!(err, Error::OverrideOutOfRange { .. }));
        assert!(err.is_inline());
        assert!(w.set_limit(f64::NAN).is_err());
        assert_eq!(w.values().limit_l_mm_s, 8.0);
    }

    #[test]
    fn test_trend_window_disabled() {
        let (_, mut w) = what_if("99 P-02");
        let err = w.set_trend_window(48.0).unwrap_err();
        assert!(matches!(err, Error::OverrideDisabled { .. }));
        assert_eq!(w.values().trend_window_h, 24.0);
    }

    #[test]
    fn test_gauge_fill_bounded() {
        let (_, mut w) = what_if("99 P-11");
        for limit in [6.0, 7.0, 8.0, 9.6] {
            w.set_limit(limit).unwrap();
            let pct = w.gauge_fill_pct();
            assert!((0.0..=100.0).contains(&pct));
        }
    }

    #[test]
    fn test_rf_thresholds() {
        let (_, mut w) = what_if("99 P-02");
        assert!(w.set_rf_thresholds(0.7, 0.6).is_err());
        assert!(w.set_rf_thresholds(0.2, 0.7).is_err());

        // Degrading share always exceeds one half after normalization.
        w.set_rf_thresholds(0.5, 0.9).unwrap();
        assert_eq!(w.rf_classification(), HealthState::Degrading);
        w.set_rf_thresholds(0.7, 0.7).unwrap();
        let votes = *w.votes();
        let expected = if votes.failure >= 0.7 {
            HealthState::Failure
        } else if votes.degrading + votes.failure >= 0.7 {
            HealthState::Degrading
        } else {
            HealthState::Healthy
        };
        assert_eq!(w.rf_classification(), expected);
    }

    #[test]
    fn test_missing_inputs_rejected() {
        let (mut result, _) = what_if("99 P-02");
        result.explain_panel.rul_inputs = None;
        let err = WhatIf::from_result(&result, &OverrideSchema::builtin()).unwrap_err();
        assert!(matches!(err, Error::AnalysisFailed(_)));
    }

    #[test]
    fn test_schema_with_other_default_limit_rejected() {
        let (result, _) = what_if("99 P-02");
        let mut schema = OverrideSchema::builtin();
        schema.limit_l_mm_s.default = 9.0;
        let err = WhatIf::from_result(&result, &schema).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn test_reset_reproduces_rul_under_custom_default_limit() {
        let mut reference = pdm_config::ReferenceData::builtin().clone();
        reference.overrides.limit_l_mm_s.default = 9.0;
        let result = AnalysisGenerator::new(&reference)
            .generate("99 P-11", ImportMode::Csv)
            .unwrap();
        let mut w = WhatIf::from_result(&result, &reference.overrides).unwrap();
        w.set_limit(6.5).unwrap();
        w.reset();
        assert_eq!(w.rul_days(), result.rul_days);
    }

    #[test]
    fn test_outcome_snapshot() {
        let (result, mut w) = what_if("PDA-C-01");
        w.set_limit(9.0).unwrap();
        let outcome = w.outcome();
        assert_eq!(outcome.displayed_rul_days, result.rul_days);
        assert_eq!(outcome.overrides.limit_l_mm_s, 9.0);
        assert!(!outcome.is_default);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["overrides"]["limit_L_mm_s"], 9.0);
    }
}
