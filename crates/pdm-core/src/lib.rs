//! Predictive-maintenance dashboard core.
//!
//! - [`analysis`]: deterministic analysis generation and tag coverage
//! - [`what_if`]: live override recalculation over a displayed analysis
//! - [`dashboard`]: latest-wins import controller and view state
//! - [`logging`], [`output`], [`schema`]: CLI plumbing
//!
//! With the `report` feature, [`report`] bridges into the HTML renderer.

pub mod analysis;
pub mod dashboard;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod schema;
pub mod what_if;

#[cfg(feature = "report")]
pub mod report;

pub use analysis::{AnalysisGenerator, TagCoverage};
pub use dashboard::{AnalysisSource, ImportController, ImportOutcome, SimulatedSource};
pub use exit_codes::ExitCode;
pub use what_if::{OverrideValues, WhatIf, WhatIfOutcome};
