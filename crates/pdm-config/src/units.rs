//! Refinery units and the assets selectable under each.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RefineryUnit {
    pub name: String,
    pub assets: Vec<String>,
}

/// Units in selector order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RefineryUnits(pub Vec<RefineryUnit>);

impl RefineryUnits {
    pub fn builtin() -> Self {
        let unit = |name: &str, assets: &[&str]| RefineryUnit {
            name: name.to_string(),
            assets: assets.iter().map(|a| a.to_string()).collect(),
        };
        RefineryUnits(vec![
            unit("LOUP", &["99 P-02", "99 P-11", "99 C-01", "99 C-02"]),
            unit("SEU1-3", &["SEU1-P-01", "SEU2-C-05", "SEU3-P-10"]),
            unit("PDA", &["PDA-P-01", "PDA-C-01"]),
            unit("PDU", &["PDU-P-05", "PDU-P-08"]),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RefineryUnit> {
        self.0.iter()
    }

    /// Unit owning `asset`, if any.
    pub fn unit_of(&self, asset: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|u| u.assets.iter().any(|a| a == asset))
            .map(|u| u.name.as_str())
    }

    /// Assets listed under `unit`.
    pub fn assets_of(&self, unit: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|u| u.name == unit)
            .map(|u| u.assets.as_slice())
    }

    pub fn asset_count(&self) -> usize {
        self.0.iter().map(|u| u.assets.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let units = RefineryUnits::builtin();
        let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["LOUP", "SEU1-3", "PDA", "PDU"]);
        assert_eq!(units.asset_count(), 11);
    }

    #[test]
    fn test_unit_of() {
        let units = RefineryUnits::builtin();
        assert_eq!(units.unit_of("99 P-11"), Some("LOUP"));
        assert_eq!(units.unit_of("SEU3-P-10"), Some("SEU1-3"));
        assert_eq!(units.unit_of("XX-1"), None);
    }

    #[test]
    fn test_assets_of() {
        let units = RefineryUnits::builtin();
        assert_eq!(units.assets_of("PDU").unwrap(), &["PDU-P-05", "PDU-P-08"]);
        assert!(units.assets_of("NOPE").is_none());
    }
}
