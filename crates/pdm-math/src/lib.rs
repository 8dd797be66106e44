//! Predictive-maintenance math utilities.

pub mod math;

pub use math::round::*;
pub use math::rul::*;
pub use math::seed::*;
