//! JSON Schema generation for CLI output types.
//!
//! ```bash
//! pdm-core schema --list
//! pdm-core schema AnalysisResult
//! pdm-core schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::analysis::TagCoverage;
pub use crate::what_if::{OverrideValues, WhatIfOutcome};
pub use pdm_common::{
    AnalysisResult, AssetId, AssetTagSummary, ExplainPanel, ExplainStep, HealthState, ImportMode,
    PerformanceMetrics, ShapFeature, TagInfo, TagSummaryMetrics,
};
pub use pdm_config::{OverrideParam, OverrideSchema, ReferenceData, RefineryUnits, TagRegistry};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Analysis
        ("AnalysisResult", "Complete analysis for one asset"),
        ("AssetId", "Selected asset identifier"),
        ("HealthState", "Health classification (Healthy, Degrading, Failure)"),
        ("ImportMode", "Data source (PHD historian or CSV upload)"),
        ("ShapFeature", "One ranked SHAP contribution"),
        ("PerformanceMetrics", "Per-stage timings with SLO thresholds"),
        // Explain mode
        ("ExplainPanel", "Step-by-step model trace"),
        ("ExplainStep", "One step of a model trace"),
        // Tags
        ("TagInfo", "Tag tracked by the model"),
        ("AssetTagSummary", "Vibration/temperature tag coverage"),
        ("TagSummaryMetrics", "Manual and auto-filled tag counts"),
        ("TagCoverage", "Resolved coverage with auto-fill source"),
        // Overrides
        ("OverrideParam", "Range, step and default of one override"),
        ("OverrideSchema", "All override parameters"),
        ("OverrideValues", "Current override positions"),
        ("WhatIfOutcome", "Recalculated RUL and RF class"),
        // Reference data
        ("TagRegistry", "Sensor tag registry"),
        ("RefineryUnits", "Refinery units and their assets"),
        ("ReferenceData", "Complete reference-data file"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns `None` for an unknown type name.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "AnalysisResult" => schema_for!(AnalysisResult),
        "AssetId" => schema_for!(AssetId),
        "HealthState" => schema_for!(HealthState),
        "ImportMode" => schema_for!(ImportMode),
        "ShapFeature" => schema_for!(ShapFeature),
        "PerformanceMetrics" => schema_for!(PerformanceMetrics),
        "ExplainPanel" => schema_for!(ExplainPanel),
        "ExplainStep" => schema_for!(ExplainStep),
        "TagInfo" => schema_for!(TagInfo),
        "AssetTagSummary" => schema_for!(AssetTagSummary),
        "TagSummaryMetrics" => schema_for!(TagSummaryMetrics),
        "TagCoverage" => schema_for!(TagCoverage),
        "OverrideParam" => schema_for!(OverrideParam),
        "OverrideSchema" => schema_for!(OverrideSchema),
        "OverrideValues" => schema_for!(OverrideValues),
        "WhatIfOutcome" => schema_for!(WhatIfOutcome),
        "TagRegistry" => schema_for!(TagRegistry),
        "RefineryUnits" => schema_for!(RefineryUnits),
        "ReferenceData" => schema_for!(ReferenceData),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}

/// Schema output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

/// Format a schema value for output.
pub fn format_schema(schema: &Value, format: SchemaFormat) -> serde_json::Result<String> {
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(schema),
        SchemaFormat::JsonCompact => serde_json::to_string(schema),
    }
}
