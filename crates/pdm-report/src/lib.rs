//! HTML dashboard composer for predictive-maintenance analyses.
//!
//! Renders the current dashboard state to a single self-contained HTML
//! page. The page mirrors what the interactive dashboard shows for the same
//! state and view toggles:
//!
//! - **Empty**: welcome panel with an import prompt
//! - **Loading**: spinner naming the asset being analyzed
//! - **Failed**: "Analysis Failed" panel with the error message
//! - **Ready**: RUL gauge, health card, AI interpretation, model internals,
//!   SHAP contributors, recommendation, import info, tracked tags and
//!   performance SLOs
//!
//! Explain mode adds step traces and override panels. The Tag Registry page
//! and the tag-summary and import modals render when their toggles are set.
//!
//! # Example
//!
//! ```no_run
//! use pdm_common::{DashboardState, ViewState};
//! use pdm_config::ReferenceData;
//! use pdm_report::{DashboardRenderer, DashboardView, ReportConfig};
//!
//! let state = DashboardState::Empty;
//! let view = DashboardView::new(&state, ViewState::default(), ReferenceData::builtin());
//! let html = DashboardRenderer::new(ReportConfig::default()).render(&view).unwrap();
//! assert!(html.contains("No Data Loaded"));
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod sections;

pub use config::{ReportConfig, ReportSections, ReportTheme};
pub use error::{ReportError, Result};
pub use generator::DashboardRenderer;
pub use sections::{DashboardView, OverrideControl, OverrideReadout};
