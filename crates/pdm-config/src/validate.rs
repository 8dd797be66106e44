//! Reference-data validation errors and semantic validation.

use std::collections::HashSet;
use thiserror::Error;

use crate::overrides::OverrideParam;
use crate::reference::ReferenceData;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reference-data validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 50,
            ValidationError::ParseError(_) => 51,
            ValidationError::SemanticError(_) => 52,
            ValidationError::MissingField(_) => 53,
            ValidationError::InvalidValue { .. } => 54,
            ValidationError::VersionMismatch { .. } => 55,
        }
    }
}

impl From<ValidationError> for pdm_common::Error {
    fn from(err: ValidationError) -> Self {
        pdm_common::Error::Config(err.to_string())
    }
}

/// Validate reference data semantically.
pub fn validate_reference_data(data: &ReferenceData) -> ValidationResult<()> {
    if data.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: data.schema_version.clone(),
        });
    }

    validate_registry(data)?;
    validate_units(data)?;
    validate_manual_tags(data)?;
    validate_overrides(data)?;

    Ok(())
}

fn validate_registry(data: &ReferenceData) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for (idx, entry) in data.tag_registry.iter().enumerate() {
        if entry.tag.trim().is_empty() {
            return Err(ValidationError::MissingField(format!("tag_registry[{idx}].tag")));
        }
        if entry.asset.trim().is_empty() {
            return Err(ValidationError::MissingField(format!(
                "tag_registry[{idx}].asset"
            )));
        }
        if entry.unit.trim().is_empty() {
            return Err(ValidationError::MissingField(format!("tag_registry[{idx}].unit")));
        }
        if !seen.insert(entry.tag.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate tag code '{}' in tag_registry",
                entry.tag
            )));
        }
    }
    Ok(())
}

fn validate_units(data: &ReferenceData) -> ValidationResult<()> {
    if data.refinery_units.0.is_empty() {
        return Err(ValidationError::SemanticError(
            "refinery_units must list at least one unit".to_string(),
        ));
    }

    let mut names = HashSet::new();
    let mut assets = HashSet::new();
    for unit in data.refinery_units.iter() {
        if !names.insert(unit.name.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate refinery unit '{}'",
                unit.name
            )));
        }
        if unit.assets.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("refinery_units.{}.assets", unit.name),
                message: "Must list at least one asset".to_string(),
            });
        }
        for asset in &unit.assets {
            if asset.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("refinery_units.{}.assets", unit.name),
                    message: "Asset ids must not be blank".to_string(),
                });
            }
            if !assets.insert(asset.as_str()) {
                return Err(ValidationError::SemanticError(format!(
                    "asset '{asset}' listed under more than one unit"
                )));
            }
        }
    }
    Ok(())
}

fn validate_manual_tags(data: &ReferenceData) -> ValidationResult<()> {
    for (asset, set) in &data.manual_asset_tags.0 {
        if set.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("manual_asset_tags.{asset}"),
                message: "Must define at least one tag".to_string(),
            });
        }
        for def in &set.vibration {
            check_prefix(asset, "vibration", &def.tag, "VI")?;
        }
        for def in &set.temperature {
            check_prefix(asset, "temperature", &def.tag, "TI")?;
        }
    }
    Ok(())
}

fn check_prefix(asset: &str, list: &str, tag: &str, prefix: &str) -> ValidationResult<()> {
    if !tag.starts_with(prefix) {
        return Err(ValidationError::InvalidValue {
            field: format!("manual_asset_tags.{asset}.{list}"),
            message: format!("Tag '{tag}' must start with '{prefix}'"),
        });
    }
    Ok(())
}

fn validate_overrides(data: &ReferenceData) -> ValidationResult<()> {
    for (name, param) in data.overrides.iter() {
        validate_param(name, param)?;
    }

    let degrading = data.overrides.rf_degrading_threshold.default;
    let failure = data.overrides.rf_failure_threshold.default;
    if degrading >= failure {
        return Err(ValidationError::SemanticError(format!(
            "rf_degrading_threshold default ({degrading}) must be below rf_failure_threshold default ({failure})"
        )));
    }
    Ok(())
}

fn validate_param(name: &str, param: &OverrideParam) -> ValidationResult<()> {
    if !(param.min.is_finite() && param.max.is_finite() && param.default.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: format!("overrides.{name}"),
            message: "Bounds and default must be finite".to_string(),
        });
    }
    if param.min > param.max {
        return Err(ValidationError::InvalidValue {
            field: format!("overrides.{name}.min"),
            message: format!("Must be <= max ({}), got {}", param.max, param.min),
        });
    }
    if param.default < param.min || param.default > param.max {
        return Err(ValidationError::InvalidValue {
            field: format!("overrides.{name}.default"),
            message: format!(
                "Must be in [{}, {}], got {}",
                param.min, param.max, param.default
            ),
        });
    }
    if !(param.step > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("overrides.{name}.step"),
            message: format!("Must be positive, got {}", param.step),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryTag;

    fn builtin() -> ReferenceData {
        ReferenceData::builtin().clone()
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut data = builtin();
        let first: RegistryTag = data.tag_registry.0[0].clone();
        data.tag_registry.0.push(first);
        let err = validate_reference_data(&data).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(ref m) if m.contains("VI1213AA")));
    }

    #[test]
    fn test_default_outside_range_rejected() {
        let mut data = builtin();
        data.overrides.limit_l_mm_s.default = 10.0;
        let err = validate_reference_data(&data).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "overrides.limit_L_mm_s.default")
        );
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut data = builtin();
        data.overrides.ewma_alpha.step = 0.0;
        assert!(matches!(
            validate_reference_data(&data).unwrap_err(),
            ValidationError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_threshold_order_rejected() {
        let mut data = builtin();
        data.overrides.rf_degrading_threshold.max = 0.9;
        data.overrides.rf_degrading_threshold.default = 0.8;
        assert!(matches!(
            validate_reference_data(&data).unwrap_err(),
            ValidationError::SemanticError(_)
        ));
    }

    #[test]
    fn test_manual_prefix_checked() {
        let mut data = builtin();
        if let Some(set) = data.manual_asset_tags.0.get_mut("99 P-02") {
            set.vibration[0].tag = "TI9999".to_string();
        }
        assert!(matches!(
            validate_reference_data(&data).unwrap_err(),
            ValidationError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_asset_in_two_units_rejected() {
        let mut data = builtin();
        data.refinery_units.0[1].assets.push("99 P-02".to_string());
        assert!(matches!(
            validate_reference_data(&data).unwrap_err(),
            ValidationError::SemanticError(_)
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut data = builtin();
        data.schema_version = "0.9".to_string();
        assert_eq!(validate_reference_data(&data).unwrap_err().code(), 55);
    }

    #[test]
    fn test_into_common_error() {
        let err: pdm_common::Error = ValidationError::ParseError("x".into()).into();
        assert_eq!(err.category(), pdm_common::ErrorCategory::Config);
    }
}
