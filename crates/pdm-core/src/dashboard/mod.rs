//! Dashboard state machine and the latest-wins import controller.

pub mod controller;
pub mod source;

pub use controller::{ImportController, ImportOutcome, ImportRequest};
pub use pdm_common::{CurrentView, DashboardState, ImportTicket, ModelTab, ViewState};
pub use source::{import_phases, AnalysisSource, ImportPhase, SimulatedSource};
