//! Explain panels: ordered step traces narrating how a number was derived.
//!
//! Panels are presentation data. The only fields read back computationally
//! are the captured [`RulInputs`] and [`RfVotes`], which the what-if
//! recalculation reuses instead of re-hashing the asset.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Value attached to an explain step.
///
/// Serialized untagged so the JSON reads naturally: a number, a string, or
/// an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ExplainValue {
    Scalar(f64),
    Labeled(String),
    Mapping(BTreeMap<String, ExplainValue>),
}

impl ExplainValue {
    pub fn labeled(text: impl Into<String>) -> Self {
        ExplainValue::Labeled(text.into())
    }

    /// Build a mapping from `(name, value)` pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ExplainValue)>,
    {
        ExplainValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Render for display.
    pub fn display(&self) -> String {
        match self {
            ExplainValue::Scalar(v) => format_scalar(*v),
            ExplainValue::Labeled(s) => s.clone(),
            ExplainValue::Mapping(entries) => {
                let mut out = String::new();
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{key}: {}", value.display());
                }
                out
            }
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ExplainValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

fn format_scalar(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

impl From<f64> for ExplainValue {
    fn from(v: f64) -> Self {
        ExplainValue::Scalar(v)
    }
}

impl From<&str> for ExplainValue {
    fn from(s: &str) -> Self {
        ExplainValue::Labeled(s.to_string())
    }
}

impl From<String> for ExplainValue {
    fn from(s: String) -> Self {
        ExplainValue::Labeled(s)
    }
}

/// Named weight in a fixed importance table; order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

/// One step of a derivation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExplainStep {
    /// 1-based position in the panel.
    pub step: u32,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeMap<String, ExplainValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ExplainValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Vec<FeatureWeight>>,
}

impl ExplainStep {
    pub fn new(step: u32, desc: impl Into<String>) -> Self {
        Self {
            step,
            desc: desc.into(),
            formula: None,
            values: None,
            result: None,
            units: None,
            importance: None,
        }
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_values<K, I>(mut self, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ExplainValue)>,
    {
        self.values = Some(values.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    pub fn with_result(mut self, result: impl Into<ExplainValue>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_importance(mut self, importance: Vec<FeatureWeight>) -> Self {
        self.importance = Some(importance);
        self
    }
}

/// Model a panel explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExplainModel {
    Rul,
    RandomForest,
    XgboostShap,
}

impl ExplainModel {
    pub fn title(&self) -> &'static str {
        match self {
            ExplainModel::Rul => "RUL Estimation",
            ExplainModel::RandomForest => "Random Forest Classifier",
            ExplainModel::XgboostShap => "XGBoost Risk + SHAP",
        }
    }
}

/// Inputs of the RUL extrapolation captured at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RulInputs {
    /// Vibration limit `L` in mm/s.
    pub limit: f64,
    /// Combined RMS vibration in mm/s.
    pub rms: f64,
    /// Fitted trend in mm/s per hour.
    pub slope: f64,
}

/// Normalized Random Forest vote shares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RfVotes {
    pub healthy: f64,
    pub degrading: f64,
    pub failure: f64,
}

/// Ordered derivation trace for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExplainPanel {
    pub model: ExplainModel,
    pub steps: Vec<ExplainStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Present on the RUL panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rul_inputs: Option<RulInputs>,
    /// Present on the Random Forest panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf_votes: Option<RfVotes>,
}

impl ExplainPanel {
    pub fn new(model: ExplainModel, steps: Vec<ExplainStep>) -> Self {
        Self {
            model,
            steps,
            narration: None,
            rul_inputs: None,
            rf_votes: None,
        }
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }

    /// True when step numbers run 1..=n in emission order.
    pub fn is_sequential(&self) -> bool {
        self.steps
            .iter()
            .enumerate()
            .all(|(i, s)| s.step as usize == i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalar_and_label() {
        assert_eq!(ExplainValue::Scalar(0.41).display(), "0.41");
        assert_eq!(ExplainValue::Scalar(8.0).display(), "8");
        assert_eq!(ExplainValue::labeled("Degrading").display(), "Degrading");
    }

    #[test]
    fn test_display_mapping_sorted_by_key() {
        let v = ExplainValue::mapping([
            ("Y", ExplainValue::Scalar(6.1)),
            ("X", ExplainValue::Scalar(5.9)),
        ]);
        assert_eq!(v.display(), "X: 5.9, Y: 6.1");
    }

    #[test]
    fn test_untagged_json_shape() {
        let step = ExplainStep::new(2, "Combine to RMS")
            .with_formula("sqrt((X²+Y²+Z²)/3)")
            .with_result("6.01 mm/s");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["result"], "6.01 mm/s");
        assert!(json.get("values").is_none());

        let back: ExplainStep = serde_json::from_value(json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_nested_mapping_roundtrip() {
        let v = ExplainValue::mapping([
            ("votes", ExplainValue::mapping([("Healthy", ExplainValue::Scalar(0.1))])),
            ("label", ExplainValue::labeled("x")),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        let back: ExplainValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_panel_sequential() {
        let panel = ExplainPanel::new(
            ExplainModel::Rul,
            vec![ExplainStep::new(1, "a"), ExplainStep::new(2, "b")],
        );
        assert!(panel.is_sequential());

        let broken = ExplainPanel::new(
            ExplainModel::Rul,
            vec![ExplainStep::new(2, "a"), ExplainStep::new(1, "b")],
        );
        assert!(!broken.is_sequential());
    }
}
