//! Core math modules.

pub mod round;
pub mod rul;
pub mod seed;
