//! Dashboard state shared by the import controller and the renderer.
//!
//! [`DashboardState`] holds the single current-result slot. [`ViewState`]
//! holds UI toggles that never affect the analysis itself.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analysis::{AnalysisResult, ImportMode};
use crate::error::{Error, Result};
use crate::id::AssetId;

/// Top-level page shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentView {
    #[default]
    Dashboard,
    TagRegistry,
}

/// Model-internals tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTab {
    /// Random Forest classifier
    #[default]
    Rf,
    /// XGBoost risk with SHAP attribution
    Xgb,
}

impl ModelTab {
    pub fn label(&self) -> &'static str {
        match self {
            ModelTab::Rf => "Random Forest",
            ModelTab::Xgb => "XGBoost + SHAP",
        }
    }
}

impl std::fmt::Display for ModelTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTab::Rf => write!(f, "rf"),
            ModelTab::Xgb => write!(f, "xgb"),
        }
    }
}

/// Monotonic id of one import action; later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportTicket(pub u64);

impl std::fmt::Display for ImportTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dashboard panel state.
///
/// `Empty → Loading → Ready | Failed`, and `Ready | Failed → Loading` on
/// the next import. No state is terminal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    #[default]
    Empty,
    Loading {
        ticket: ImportTicket,
        asset: AssetId,
        mode: ImportMode,
    },
    Ready(Arc<AnalysisResult>),
    Failed {
        message: String,
    },
}

impl DashboardState {
    pub fn phase(&self) -> &'static str {
        match self {
            DashboardState::Empty => "empty",
            DashboardState::Loading { .. } => "loading",
            DashboardState::Ready(_) => "ready",
            DashboardState::Failed { .. } => "failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading { .. })
    }

    pub fn result(&self) -> Option<&Arc<AnalysisResult>> {
        match self {
            DashboardState::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// Ticket of the in-flight import, if any.
    pub fn loading_ticket(&self) -> Option<ImportTicket> {
        match self {
            DashboardState::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }
}

/// Orthogonal UI toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub current_view: CurrentView,
    pub explain_mode: bool,
    pub active_tab: ModelTab,
    pub import_modal_open: bool,
    pub tag_summary_open: bool,
}

impl ViewState {
    pub fn toggle_explain(&mut self) {
        self.explain_mode = !self.explain_mode;
    }

    pub fn select_tab(&mut self, tab: ModelTab) {
        self.active_tab = tab;
    }

    pub fn show(&mut self, view: CurrentView) {
        self.current_view = view;
    }

    pub fn open_import_modal(&mut self) {
        self.import_modal_open = true;
    }

    pub fn close_import_modal(&mut self) {
        self.import_modal_open = false;
    }

    /// Open the tag summary; only possible with a result on screen.
    pub fn open_tag_summary(&mut self, state: &DashboardState) -> Result<()> {
        if state.result().is_none() {
            return Err(Error::InvalidInput(
                "no analysis loaded; import an asset first".to_string(),
            ));
        }
        self.tag_summary_open = true;
        Ok(())
    }

    pub fn close_tag_summary(&mut self) {
        self.tag_summary_open = false;
    }

    /// Starting an import closes the modals and returns to the dashboard.
    pub fn on_import_started(&mut self) {
        self.import_modal_open = false;
        self.tag_summary_open = false;
        self.current_view = CurrentView::Dashboard;
    }
}
