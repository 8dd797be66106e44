//! The reference tables every analysis reads.
//!
//! Built-in tables are compiled in and loaded once per process. An optional
//! JSON file may replace any subset of sections; omitted sections fall back
//! to the built-in ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

use crate::manual_tags::ManualAssetTags;
use crate::overrides::OverrideSchema;
use crate::registry::TagRegistry;
use crate::resolve::ReferencePath;
use crate::units::RefineryUnits;
use crate::validate::{validate_reference_data, ValidationError, ValidationResult};

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

/// Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceData {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "TagRegistry::builtin")]
    pub tag_registry: TagRegistry,
    #[serde(default = "RefineryUnits::builtin")]
    pub refinery_units: RefineryUnits,
    #[serde(default = "ManualAssetTags::builtin")]
    pub manual_asset_tags: ManualAssetTags,
    #[serde(default = "OverrideSchema::builtin")]
    pub overrides: OverrideSchema,
}

static BUILTIN: OnceLock<ReferenceData> = OnceLock::new();

impl ReferenceData {
    /// Process-wide built-in tables.
    pub fn builtin() -> &'static ReferenceData {
        BUILTIN.get_or_init(|| ReferenceData {
            schema_version: default_schema_version(),
            tag_registry: TagRegistry::builtin(),
            refinery_units: RefineryUnits::builtin(),
            manual_asset_tags: ManualAssetTags::builtin(),
            overrides: OverrideSchema::builtin(),
        })
    }

    /// Load and validate a reference-data file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate reference data from JSON.
    pub fn from_json(content: &str) -> ValidationResult<Self> {
        let data: ReferenceData = serde_json::from_str(content)
            .map_err(|e| ValidationError::ParseError(e.to_string()))?;
        validate_reference_data(&data)?;
        Ok(data)
    }

    /// Load whatever [`crate::resolve_reference_path`] selected.
    pub fn load(resolved: &ReferencePath) -> ValidationResult<Cow<'static, ReferenceData>> {
        match &resolved.path {
            Some(path) => {
                let data = Self::from_file(path)?;
                tracing::debug!(
                    path = %path.display(),
                    source = %resolved.source,
                    tags = data.tag_registry.len(),
                    "loaded reference data file"
                );
                Ok(Cow::Owned(data))
            }
            None => Ok(Cow::Borrowed(Self::builtin())),
        }
    }

    /// Canonical JSON used for hashing.
    pub fn canonical_json(&self) -> ValidationResult<String> {
        serde_json::to_string(self).map_err(|e| ValidationError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_shared() {
        let a = ReferenceData::builtin() as *const ReferenceData;
        let b = ReferenceData::builtin() as *const ReferenceData;
        assert_eq!(a, b);
    }

    #[test]
    fn test_builtin_validates() {
        validate_reference_data(ReferenceData::builtin()).unwrap();
    }

    #[test]
    fn test_empty_object_falls_back_to_builtin() {
        let data = ReferenceData::from_json("{}").unwrap();
        assert_eq!(&data, ReferenceData::builtin());
    }

    #[test]
    fn test_partial_override() {
        let data = ReferenceData::from_json(
            r#"{"refinery_units":[{"name":"TEST","assets":["T 1"]}]}"#,
        )
        .unwrap();
        assert_eq!(data.refinery_units.unit_of("T 1"), Some("TEST"));
        assert_eq!(data.tag_registry.len(), 7);
    }

    #[test]
    fn test_parse_error() {
        let err = ReferenceData::from_json("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_load_builtin_borrows() {
        let resolved = ReferencePath::default();
        let data = ReferenceData::load(&resolved).unwrap();
        assert!(matches!(data, Cow::Borrowed(_)));
    }
}
