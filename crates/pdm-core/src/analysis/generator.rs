//! The analysis generator.
//!
//! A pure function of `(asset, import mode, timestamp)` and the reference
//! tables: every number is derived from deterministic draws keyed by the
//! asset id. There is no model inference and no sensor I/O.

use chrono::{DateTime, Utc};

use pdm_common::{
    AnalysisResult, AssetId, Error, Explanation, FeedbackId, HealthState, ImportMode, Result,
    SCHEMA_VERSION,
};
use pdm_config::ReferenceData;
use pdm_math::{combined_rms, js_round, pseudo_random, round2, round4, rul_confidence_band, RulEstimate};

use super::metadata;
use super::panels::{self, VibrationReading};
use super::shap::shap_summary;
use super::tags::{resolve_tag_coverage, tracked_tags};
use crate::logging::event_names;

/// Classify a risk score: `< 0.30` Healthy, `< 0.60` Degrading, else Failure.
pub fn classify_risk(risk: f64) -> HealthState {
    HealthState::from_risk(risk)
}

/// `round(rand * 90 + 5) / 100`, so risk lies in `[0.05, 0.95]`.
pub fn risk_from_draw(rand: f64) -> f64 {
    js_round(rand * 90.0 + 5.0) / 100.0
}

/// Synthesize the three axis readings and the trend for a draw.
pub fn vibration_reading(rand: f64) -> VibrationReading {
    let current = round2(rand * 3.0 + 5.0);
    let x = round2(current - rand * 0.2);
    let y = round2(current + rand * 0.3);
    let z = round2(current - rand * 0.1);
    VibrationReading {
        x,
        y,
        z,
        rms: combined_rms(x, y, z),
        slope: round4(0.01 + rand * 0.08),
    }
}

/// Produces complete analyses against a fixed set of reference tables.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisGenerator<'a> {
    reference: &'a ReferenceData,
}

impl AnalysisGenerator<'static> {
    /// Generator over the compiled-in tables.
    pub fn builtin() -> Self {
        AnalysisGenerator::new(ReferenceData::builtin())
    }
}

impl<'a> AnalysisGenerator<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        AnalysisGenerator { reference }
    }

    pub fn reference(&self) -> &'a ReferenceData {
        self.reference
    }

    /// Analyze `asset`, stamped with the current time.
    pub fn generate(&self, asset: &str, mode: ImportMode) -> Result<AnalysisResult> {
        self.generate_at(asset, mode, Utc::now())
    }

    /// Analyze `asset` as of `timestamp`.
    ///
    /// Blank ids are rejected with [`Error::InvalidInput`]. Any other failure
    /// is [`Error::AnalysisFailed`]; no partial result is ever returned.
    pub fn generate_at(
        &self,
        asset: &str,
        mode: ImportMode,
        timestamp: DateTime<Utc>,
    ) -> Result<AnalysisResult> {
        let asset = AssetId::parse(asset)?;
        let result = self.build(&asset, mode, timestamp);
        match &result {
            Ok(analysis) => tracing::debug!(
                target: event_names::ANALYSIS_GENERATED,
                asset = %asset,
                mode = %mode,
                risk = analysis.risk,
                health_state = %analysis.health_state,
                rul_days = analysis.rul_days,
                "analysis generated"
            ),
            Err(err) => tracing::warn!(
                target: event_names::ANALYSIS_FAILED,
                asset = %asset,
                error = %err,
                "analysis failed"
            ),
        }
        result
    }

    fn build(
        &self,
        asset: &AssetId,
        mode: ImportMode,
        timestamp: DateTime<Utc>,
    ) -> Result<AnalysisResult> {
        let rand = pseudo_random(asset.as_str());
        let risk = risk_from_draw(rand);
        let health_state = classify_risk(risk);

        let limit = self.reference.overrides.limit_l_mm_s.default;
        let reading = vibration_reading(rand);
        let estimate = RulEstimate::compute(limit, reading.rms, reading.slope).ok_or_else(|| {
            Error::AnalysisFailed(format!(
                "no RUL for limit {limit}, rms {:.4}, slope {}",
                reading.rms, reading.slope
            ))
        })?;
        let rul_ci_days = rul_confidence_band(estimate.days, rand);

        let shap = shap_summary(asset, risk);
        let top = shap
            .first()
            .ok_or_else(|| Error::AnalysisFailed("empty SHAP summary".to_string()))?;

        let tags_tracked = tracked_tags(asset, &self.reference.tag_registry, rand);
        let coverage = resolve_tag_coverage(asset, mode, self.reference);

        let explanation = Explanation {
            rul_equation: metadata::RUL_EQUATION.to_string(),
            plain_text: metadata::plain_text(health_state, risk, top, estimate.days),
        };

        Ok(AnalysisResult {
            schema_version: SCHEMA_VERSION.to_string(),
            refinery_unit: self
                .reference
                .refinery_units
                .unit_of(asset.as_str())
                .map(str::to_string),
            timestamp,
            feedback_id: FeedbackId::at(timestamp),
            data_source: mode,
            import_mode: mode.label().to_string(),
            source_file: metadata::source_file(asset, mode),
            risk,
            health_state,
            rul_days: estimate.days,
            rul_ci_days,
            explanation,
            explanation_text: metadata::explanation_text(estimate.days, &tags_tracked),
            recommendation: metadata::recommendation(health_state, top),
            explain_panel: panels::rul_panel(&reading, limit, &estimate, rul_ci_days),
            rf_explain_panel: panels::rf_panel(rand, &reading),
            xgb_explain_panel: panels::xgb_panel(risk, health_state, &shap),
            tags_tracked,
            asset_tag_summary: coverage.summary,
            tag_summary_metrics: coverage.metrics,
            auto_fill_source: coverage.auto_fill_source,
            import_status: metadata::import_status(),
            data_quality: metadata::data_quality(),
            telemetry: metadata::telemetry(mode),
            metrics: metadata::performance_metrics(asset),
            ui_color: health_state.color().to_string(),
            shap_summary: shap,
            asset_id: asset.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 22).unwrap()
    }

    fn generate(asset: &str) -> AnalysisResult {
        AnalysisGenerator::builtin()
            .generate_at(asset, ImportMode::Phd, ts())
            .unwrap()
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate("99 P-02"), generate("99 P-02"));
    }

    #[test]
    fn test_blank_asset_rejected() {
        let err = AnalysisGenerator::builtin()
            .generate_at("  ", ImportMode::Phd, ts())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_risk_from_draw_bounds() {
        assert_eq!(risk_from_draw(0.0), 0.05);
        assert_eq!(risk_from_draw(0.999), 0.95);
        assert_eq!(risk_from_draw(0.5), 0.5);
    }

    #[test]
    fn test_vibration_reading_rms_near_current() {
        let r = vibration_reading(0.4);
        assert_eq!(r.x, 6.12);
        assert_eq!(r.y, 6.32);
        assert_eq!(r.z, 6.16);
        assert_eq!(r.slope, 0.042);
        assert!(r.rms > r.x && r.rms < r.y);
    }

    #[test]
    fn test_health_and_color_consistent() {
        for id in ["99 P-02", "99 P-11", "99 C-01", "SEU1-P-01", "PDA-C-01"] {
            let a = generate(id);
            assert_eq!(a.health_state, classify_risk(a.risk));
            assert_eq!(a.ui_color, a.health_state.color());
            assert!(a.ci_brackets_rul(), "{id}");
        }
    }

    #[test]
    fn test_identity_fields() {
        let a = generate("99 P-02");
        assert_eq!(a.asset_id.as_str(), "99 P-02");
        assert_eq!(a.refinery_unit.as_deref(), Some("LOUP"));
        assert_eq!(a.feedback_id.0, "fbk_20260115T143022Z");
        assert_eq!(a.data_source, ImportMode::Phd);
        assert_eq!(a.import_mode, "Historian Fetch");
        assert_eq!(a.source_file, "phd://loup/99-P-02");
        assert_eq!(a.explanation.rul_equation, "(L - x_t)/slope");
    }

    #[test]
    fn test_rul_inputs_reproduce_rul_days() {
        let a = generate("99 P-11");
        let inputs = a.explain_panel.rul_inputs.unwrap();
        assert_eq!(inputs.limit, 8.0);
        assert_eq!(
            pdm_math::rul_days(inputs.limit, inputs.rms, inputs.slope),
            Some(a.rul_days)
        );
        assert!(a.rf_explain_panel.rf_votes.is_some());
    }

    #[test]
    fn test_panels_sequential() {
        let a = generate("PDU-P-05");
        for panel in [&a.explain_panel, &a.rf_explain_panel, &a.xgb_explain_panel] {
            assert!(panel.is_sequential());
        }
    }

    #[test]
    fn test_unknown_unit_asset_has_no_refinery_unit() {
        let a = generate("ZZ X-1");
        assert!(a.refinery_unit.is_none());
        assert!(a.asset_tag_summary.auto_filled);
    }
}
