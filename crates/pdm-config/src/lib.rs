//! Predictive-maintenance reference data loading and validation.
//!
//! This crate provides:
//! - The built-in Tag Registry, refinery units, manual asset-tag map and
//!   override schema, loaded once per process and never mutated
//! - Optional reference-data file resolution (CLI → env → XDG → defaults)
//! - Semantic validation of reference data
//! - Snapshots (content hashes + counts) for diagnostics

pub mod manual_tags;
pub mod overrides;
pub mod reference;
pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod units;
pub mod validate;

pub use manual_tags::{ManualAssetTagSet, ManualAssetTags, ManualTagDef};
pub use overrides::{OverrideParam, OverrideSchema};
pub use reference::ReferenceData;
pub use registry::{RegistryTag, TagRegistry};
pub use resolve::{resolve_reference_path, ConfigSource, ReferencePath};
pub use snapshot::ReferenceSnapshot;
pub use units::{RefineryUnit, RefineryUnits};
pub use validate::{validate_reference_data, ValidationError, ValidationResult};

/// Schema version for reference-data files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
