//! Predictive-maintenance common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The analysis result model produced by the generator
//! - Asset identity with input validation
//! - The unified error type and its taxonomy
//! - CLI output formats
//! - Dashboard view enums shared by the core and the renderer

pub mod analysis;
pub mod error;
pub mod explain;
pub mod id;
pub mod output;
pub mod tags;
pub mod view;

pub use analysis::{
    AnalysisResult, DataQuality, Explanation, HealthState, ImportMode, ImportStatus,
    ImportTelemetry, PerformanceMetrics, ShapDirection, ShapFeature,
};
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use explain::{
    ExplainModel, ExplainPanel, ExplainStep, ExplainValue, FeatureWeight, RfVotes, RulInputs,
};
pub use id::{AssetId, FeedbackId};
pub use output::OutputFormat;
pub use tags::{AssetSummaryTag, AssetTagSummary, TagInfo, TagKind, TagSource, TagSummaryMetrics};
pub use view::{CurrentView, DashboardState, ImportTicket, ModelTab, ViewState};

/// Schema version of the serialized analysis result.
pub const SCHEMA_VERSION: &str = "1.0.0";
