//! Import metadata, timing and narrative text attached to every analysis.

use pdm_common::{
    AssetId, DataQuality, HealthState, ImportMode, ImportStatus, ImportTelemetry,
    PerformanceMetrics, ShapFeature, TagInfo,
};
use pdm_math::{js_round, pseudo_random_salted};

pub const RUL_EQUATION: &str = "(L - x_t)/slope";

const HEALTHY_RECOMMENDATION: &str =
    "Asset operating within normal parameters. Continue routine monitoring.";

pub fn import_status() -> ImportStatus {
    ImportStatus {
        rows_read: 20_480,
        valid_rows: 20_231,
        quality_pct: 98.8,
    }
}

pub fn data_quality() -> DataQuality {
    DataQuality {
        missing_pct: 1.2,
        unit_mismatch: false,
    }
}

/// Import timings; uploads have no fetch phase.
pub fn telemetry(mode: ImportMode) -> ImportTelemetry {
    ImportTelemetry {
        fetch_ms: match mode {
            ImportMode::Phd => 1_950,
            ImportMode::Csv => 0,
        },
        parse_ms: 480,
        map_ms: 210,
    }
}

/// Per-stage timings with asset-keyed jitter.
pub fn performance_metrics(asset: &AssetId) -> PerformanceMetrics {
    let jitter = |stage: &str, scale: f64, floor: u32| {
        js_round(pseudo_random_salted(asset.as_str(), stage) * scale) as u32 + floor
    };
    PerformanceMetrics {
        feature_ms: jitter("feature", 600.0, 200),
        model_ms: jitter("model", 250.0, 50),
        shap_ms: jitter("shap", 400.0, 100),
        render_ms: jitter("render", 150.0, 50),
    }
}

pub fn source_file(asset: &AssetId, mode: ImportMode) -> String {
    match mode {
        ImportMode::Phd => format!("phd://loup/{}", asset.hyphenated()),
        ImportMode::Csv => format!("C:/uploads/asset_data_{}.csv", asset.underscored()),
    }
}

pub fn recommendation(state: HealthState, top: &ShapFeature) -> String {
    let check = match state {
        HealthState::Healthy => return HEALTHY_RECOMMENDATION.to_string(),
        HealthState::Degrading => "early signs of wear",
        HealthState::Failure => "imminent failure conditions",
    };
    format!(
        "Inspect {} — high contribution to risk. Check for {check}.",
        top.feature
    )
}

pub fn plain_text(state: HealthState, risk: f64, top: &ShapFeature, rul_days: u32) -> String {
    format!(
        "The model assesses this asset as '{state}' with a risk score of {risk:.2}. \
         Based on rising {} readings, projected maintenance is due in approximately \
         {rul_days} days.",
        top.feature
    )
}

/// One-line summary; the "primarily" clause is dropped when no tags are
/// tracked.
pub fn explanation_text(rul_days: u32, tracked: &[TagInfo]) -> String {
    match tracked.first() {
        Some(first) => format!(
            "AI predicts {rul_days} days remaining; based on {} sensor tags, primarily {}.",
            tracked.len(),
            first.parameter
        ),
        None => format!("AI predicts {rul_days} days remaining; based on 0 sensor tags."),
    }
}
