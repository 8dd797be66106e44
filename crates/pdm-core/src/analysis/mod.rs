//! Deterministic analysis generation.
//!
//! [`AnalysisGenerator`] turns an asset id and import mode into a complete
//! [`pdm_common::AnalysisResult`]: risk and health state, RUL with its
//! confidence band, ranked SHAP features, explain panels, tag coverage and
//! import metadata.

pub mod generator;
pub mod metadata;
pub mod panels;
pub mod shap;
pub mod tags;

pub use generator::{classify_risk, risk_from_draw, vibration_reading, AnalysisGenerator};
pub use panels::{rf_votes, VibrationReading, RF_IMPORTANCE, XGB_BASELINE};
pub use shap::{shap_summary, SHAP_CANDIDATES};
pub use tags::{resolve_tag_coverage, tracked_tags, TagCoverage, UNKNOWN_UNIT};
