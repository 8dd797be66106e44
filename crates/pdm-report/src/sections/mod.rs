//! Data the renderer consumes.

pub mod dashboard;
pub mod overrides;

pub use dashboard::DashboardView;
pub use overrides::{OverrideControl, OverrideReadout};
