//! What one rendered page shows.

use pdm_common::{AnalysisResult, DashboardState, ViewState};
use pdm_config::ReferenceData;

use super::overrides::OverrideReadout;

/// Everything the renderer needs for one page.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub state: &'a DashboardState,
    pub view: ViewState,
    /// Registry, units and override schema backing the selectors.
    pub reference: &'a ReferenceData,
    /// Recalculated values shown in explain mode.
    pub overrides: Option<OverrideReadout>,
    /// Case-insensitive filter on the Tag Registry page.
    pub registry_filter: Option<String>,
}

impl<'a> DashboardView<'a> {
    pub fn new(state: &'a DashboardState, view: ViewState, reference: &'a ReferenceData) -> Self {
        Self {
            state,
            view,
            reference,
            overrides: None,
            registry_filter: None,
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideReadout) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_registry_filter(mut self, filter: impl Into<String>) -> Self {
        self.registry_filter = Some(filter.into());
        self
    }

    /// The analysis on screen, if any.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.state.result().map(|r| r.as_ref())
    }

    /// Override readout, only while explain mode is on.
    pub fn active_overrides(&self) -> Option<&OverrideReadout> {
        if self.view.explain_mode {
            self.overrides.as_ref()
        } else {
            None
        }
    }
}
