//! Step-by-step explain panels for the RUL, Random Forest and XGBoost
//! models.

use pdm_common::{
    ExplainModel, ExplainPanel, ExplainStep, ExplainValue, FeatureWeight, HealthState, RfVotes,
    RulInputs, ShapFeature,
};
use pdm_math::{js_round, round2, RulEstimate};

/// Intercept of the XGBoost risk decomposition.
pub const XGB_BASELINE: f64 = 0.30;

/// Fixed Random Forest feature importances, most important first.
pub const RF_IMPORTANCE: [(&str, f64); 3] =
    [("RMS_slope", 0.41), ("ΔT_slope", 0.27), ("Kurtosis", 0.15)];

/// Synthesized vibration readings for one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibrationReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rms: f64,
    pub slope: f64,
}

pub fn rul_panel(
    reading: &VibrationReading,
    limit: f64,
    estimate: &RulEstimate,
    ci: [u32; 2],
) -> ExplainPanel {
    let hours = estimate.whole_hours();
    let days = estimate.days;

    let steps = vec![
        ExplainStep::new(1, "Collect RMS values")
            .with_values([
                ("X", ExplainValue::Scalar(reading.x)),
                ("Y", ExplainValue::Scalar(reading.y)),
                ("Z", ExplainValue::Scalar(reading.z)),
            ])
            .with_units("mm/s"),
        ExplainStep::new(2, "Combine to RMS")
            .with_formula("sqrt((X²+Y²+Z²)/3)")
            .with_result(format!("{:.2} mm/s", reading.rms)),
        ExplainStep::new(3, "Fit robust trend")
            .with_result(format!("+{:.4}", reading.slope))
            .with_units("mm/s/h"),
        ExplainStep::new(4, "Compute RUL")
            .with_formula("(L - xₜ) / dx/dt")
            .with_result(format!("{hours} h ≈ {days} days")),
        ExplainStep::new(5, "Bootstrap 95% CI").with_result(format!("[{} - {}] days", ci[0], ci[1])),
    ];

    let mut panel = ExplainPanel::new(ExplainModel::Rul, steps).with_narration(format!(
        "Current vibration {:.2} mm/s trending at +{} → RUL ≈ {hours}h ({days} days).",
        reading.rms, reading.slope
    ));
    panel.rul_inputs = Some(RulInputs {
        limit,
        rms: reading.rms,
        slope: reading.slope,
    });
    panel
}

/// Normalized vote shares `H = r·0.3`, `D = 1 − r·0.5`, `F = r·0.2`.
pub fn rf_votes(rand: f64) -> RfVotes {
    let healthy = rand * 0.3;
    let degrading = 1.0 - rand * 0.5;
    let failure = rand * 0.2;
    let total = healthy + degrading + failure;
    RfVotes {
        healthy: healthy / total,
        degrading: degrading / total,
        failure: failure / total,
    }
}

pub fn rf_panel(rand: f64, reading: &VibrationReading) -> ExplainPanel {
    let votes = rf_votes(rand);
    let delta_t = rand * 5.0 + 2.0;

    let steps = vec![
        ExplainStep::new(1, "Feature vector").with_values([
            ("RMS", ExplainValue::labeled(format!("{:.2}", reading.rms))),
            ("ΔT", ExplainValue::labeled(format!("{delta_t:.2}"))),
            ("RMS_slope", ExplainValue::Scalar(reading.slope)),
        ]),
        ExplainStep::new(2, "Tree votes").with_result(ExplainValue::mapping([
            ("Healthy", ExplainValue::Scalar(round2(votes.healthy))),
            ("Degrading", ExplainValue::Scalar(round2(votes.degrading))),
            ("Failure", ExplainValue::Scalar(round2(votes.failure))),
        ])),
        ExplainStep::new(3, "Top features").with_importance(
            RF_IMPORTANCE
                .iter()
                .map(|&(feature, weight)| FeatureWeight {
                    feature: feature.to_string(),
                    weight,
                })
                .collect(),
        ),
    ];

    let mut panel = ExplainPanel::new(ExplainModel::RandomForest, steps).with_narration(format!(
        "{}% of trees vote Degrading, driven by rising vibration trend.",
        js_round(votes.degrading * 100.0)
    ));
    panel.rf_votes = Some(votes);
    panel
}

pub fn xgb_panel(risk: f64, state: HealthState, shap: &[ShapFeature]) -> ExplainPanel {
    let contributions = shap
        .iter()
        .take(3)
        .map(|f| (f.feature.clone(), ExplainValue::Scalar(f.signed_phi())));

    let steps = vec![
        ExplainStep::new(1, "Baseline").with_result(XGB_BASELINE),
        ExplainStep::new(2, "SHAP features").with_values(contributions),
        ExplainStep::new(3, "Final risk")
            .with_formula("baseline + Σφᵢ")
            .with_result(format!("{risk:.2}")),
    ];

    ExplainPanel::new(ExplainModel::XgboostShap, steps).with_narration(format!(
        "Predicted risk {risk:.2} ({state}). High vibration and ΔT drive risk ↑."
    ))
}
