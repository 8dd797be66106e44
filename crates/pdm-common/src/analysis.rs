//! The analysis result model.
//!
//! An [`AnalysisResult`] is produced in one piece per import action, held
//! as the dashboard's single current result, and replaced wholesale by the
//! next import. It is never mutated in place.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::explain::ExplainPanel;
use crate::id::{AssetId, FeedbackId};
use crate::tags::{AssetTagSummary, TagInfo, TagSummaryMetrics};

/// How the analysis input was obtained.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
pub enum ImportMode {
    /// Historian fetch
    #[default]
    #[serde(rename = "PHD")]
    Phd,
    /// CSV upload (timestamp, tag_code, value)
    #[serde(rename = "CSV")]
    Csv,
}

impl ImportMode {
    pub fn label(&self) -> &'static str {
        match self {
            ImportMode::Phd => "Historian Fetch",
            ImportMode::Csv => "CSV Upload",
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            ImportMode::Phd => "PHD",
            ImportMode::Csv => "CSV",
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Risk at or above which an asset is Degrading.
pub const DEGRADING_RISK: f64 = 0.30;
/// Risk at or above which an asset is in Failure.
pub const FAILURE_RISK: f64 = 0.60;

/// Health verdict derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum HealthState {
    Healthy,
    Degrading,
    Failure,
}

impl HealthState {
    /// `risk < 0.30` Healthy, `0.30 <= risk < 0.60` Degrading, else Failure.
    pub fn from_risk(risk: f64) -> Self {
        if risk < DEGRADING_RISK {
            HealthState::Healthy
        } else if risk < FAILURE_RISK {
            HealthState::Degrading
        } else {
            HealthState::Failure
        }
    }

    /// Display color (hex).
    pub fn color(&self) -> &'static str {
        match self {
            HealthState::Healthy => "#2ECC71",
            HealthState::Degrading => "#F1C40F",
            HealthState::Failure => "#E74C3C",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "Healthy",
            HealthState::Degrading => "Degrading",
            HealthState::Failure => "Failure",
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign of a SHAP contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ShapDirection {
    #[serde(rename = "+")]
    Positive,
    #[serde(rename = "-")]
    Negative,
}

impl ShapDirection {
    pub fn symbol(&self) -> char {
        match self {
            ShapDirection::Positive => '+',
            ShapDirection::Negative => '-',
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            ShapDirection::Positive => '↑',
            ShapDirection::Negative => '↓',
        }
    }
}

/// One ranked feature contribution. `phi` is a non-negative magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShapFeature {
    pub feature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub phi: f64,
    pub direction: ShapDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ShapFeature {
    /// `phi` with the direction applied.
    pub fn signed_phi(&self) -> f64 {
        match self.direction {
            ShapDirection::Positive => self.phi,
            ShapDirection::Negative => -self.phi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImportStatus {
    pub rows_read: u32,
    pub valid_rows: u32,
    pub quality_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataQuality {
    pub missing_pct: f64,
    pub unit_mismatch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportTelemetry {
    pub fetch_ms: u32,
    pub parse_ms: u32,
    pub map_ms: u32,
}

/// Slow-stage thresholds in milliseconds.
pub const SLOW_FEATURE_MS: u32 = 800;
pub const SLOW_MODEL_MS: u32 = 300;
pub const SLOW_SHAP_MS: u32 = 500;
pub const SLOW_RENDER_MS: u32 = 200;

/// Pipeline stage timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceMetrics {
    pub feature_ms: u32,
    pub model_ms: u32,
    pub shap_ms: u32,
    pub render_ms: u32,
}

impl PerformanceMetrics {
    /// `(stage, ms, threshold)` rows in pipeline order.
    pub fn stages(&self) -> [(&'static str, u32, u32); 4] {
        [
            ("feature", self.feature_ms, SLOW_FEATURE_MS),
            ("model", self.model_ms, SLOW_MODEL_MS),
            ("shap", self.shap_ms, SLOW_SHAP_MS),
            ("render", self.render_ms, SLOW_RENDER_MS),
        ]
    }

    /// Stages strictly above their threshold.
    pub fn slow_stages(&self) -> Vec<&'static str> {
        self.stages()
            .into_iter()
            .filter(|(_, ms, limit)| ms > limit)
            .map(|(name, _, _)| name)
            .collect()
    }

    pub fn total_ms(&self) -> u32 {
        self.feature_ms + self.model_ms + self.shap_ms + self.render_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Explanation {
    pub rul_equation: String,
    pub plain_text: String,
}

/// Complete output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub schema_version: String,

    pub asset_id: AssetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinery_unit: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub feedback_id: FeedbackId,

    pub data_source: ImportMode,
    /// Human label of `data_source`.
    pub import_mode: String,
    pub source_file: String,

    pub risk: f64,
    pub health_state: HealthState,
    pub rul_days: u32,
    pub rul_ci_days: [u32; 2],
    pub shap_summary: Vec<ShapFeature>,

    pub explanation: Explanation,
    pub explanation_text: String,
    pub recommendation: String,

    pub explain_panel: ExplainPanel,
    pub rf_explain_panel: ExplainPanel,
    pub xgb_explain_panel: ExplainPanel,

    pub tags_tracked: Vec<TagInfo>,
    pub asset_tag_summary: AssetTagSummary,
    pub tag_summary_metrics: TagSummaryMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fill_source: Option<String>,

    pub import_status: ImportStatus,
    pub data_quality: DataQuality,
    pub telemetry: ImportTelemetry,
    pub metrics: PerformanceMetrics,

    pub ui_color: String,
}

impl AnalysisResult {
    /// Highest-ranked SHAP feature.
    pub fn top_feature(&self) -> Option<&ShapFeature> {
        self.shap_summary.first()
    }

    /// True when the confidence band brackets the point estimate.
    pub fn ci_brackets_rul(&self) -> bool {
        let [low, high] = self.rul_ci_days;
        low >= 1 && low <= self.rul_days && self.rul_days <= high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_thresholds() {
        assert_eq!(HealthState::from_risk(0.2999), HealthState::Healthy);
        assert_eq!(HealthState::from_risk(0.30), HealthState::Degrading);
        assert_eq!(HealthState::from_risk(0.5999), HealthState::Degrading);
        assert_eq!(HealthState::from_risk(0.60), HealthState::Failure);
        assert_eq!(HealthState::from_risk(30.0 / 100.0), HealthState::Degrading);
        assert_eq!(HealthState::from_risk(60.0 / 100.0), HealthState::Failure);
    }

    #[test]
    fn test_health_colors() {
        assert_eq!(HealthState::Healthy.color(), "#2ECC71");
        assert_eq!(HealthState::Degrading.color(), "#F1C40F");
        assert_eq!(HealthState::Failure.color(), "#E74C3C");
    }

    #[test]
    fn test_import_mode_wire_names() {
        assert_eq!(serde_json::to_string(&ImportMode::Phd).unwrap(), "\"PHD\"");
        assert_eq!(serde_json::to_string(&ImportMode::Csv).unwrap(), "\"CSV\"");
        let back: ImportMode = serde_json::from_str("\"CSV\"").unwrap();
        assert_eq!(back, ImportMode::Csv);
        assert_eq!(ImportMode::Phd.label(), "Historian Fetch");
    }

    #[test]
    fn test_shap_direction_wire() {
        assert_eq!(serde_json::to_string(&ShapDirection::Positive).unwrap(), "\"+\"");
        let f = ShapFeature {
            feature: "rms_x".into(),
            unit: Some("mm/s".into()),
            phi: 0.2,
            direction: ShapDirection::Negative,
            note: None,
        };
        assert_eq!(f.signed_phi(), -0.2);
    }

    #[test]
    fn test_slow_stages() {
        let m = PerformanceMetrics {
            feature_ms: 801,
            model_ms: 300,
            shap_ms: 501,
            render_ms: 50,
        };
        assert_eq!(m.slow_stages(), vec!["feature", "shap"]);
        assert_eq!(m.total_ms(), 1652);
    }
}
