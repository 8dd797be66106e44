//! Tag Registry: sensor tag codes and their metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One registered sensor tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegistryTag {
    pub refinery_unit: String,
    /// Owning asset, written with hyphens (`99-P-02`).
    pub asset: String,
    pub category: String,
    pub tag: String,
    pub parameter: String,
    pub unit: String,
    pub description: String,
}

impl RegistryTag {
    /// Case-insensitive match on tag, parameter, description or asset.
    ///
    /// `needle` must already be lowercase.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.tag.to_lowercase().contains(needle)
            || self.parameter.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.asset.to_lowercase().contains(needle)
    }
}

/// Ordered list of registered tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TagRegistry(pub Vec<RegistryTag>);

impl TagRegistry {
    pub fn builtin() -> Self {
        let row = |unit: &str,
                   asset: &str,
                   category: &str,
                   tag: &str,
                   parameter: &str,
                   measure: &str,
                   description: &str| RegistryTag {
            refinery_unit: unit.to_string(),
            asset: asset.to_string(),
            category: category.to_string(),
            tag: tag.to_string(),
            parameter: parameter.to_string(),
            unit: measure.to_string(),
            description: description.to_string(),
        };

        TagRegistry(vec![
            row(
                "LOUP",
                "99-P-02",
                "Rotary",
                "VI1213AA",
                "1st Stage X-Vibration",
                "mm/s",
                "Measures lateral vibration at 1st stage bearing to detect imbalance.",
            ),
            row(
                "LOUP",
                "99-P-02",
                "Rotary",
                "TI1260A",
                "1st Stage Motor Bearing Temp",
                "°C",
                "Tracks heat buildup in motor bearing, indicating friction or wear.",
            ),
            row(
                "LOUP",
                "99-P-02",
                "Rotary",
                "PI1255B",
                "Discharge Pressure",
                "bar",
                "Monitors the output pressure of the pump system.",
            ),
            row(
                "LOUP",
                "99-P-11",
                "Rotary",
                "VI2313AB",
                "2nd Stage Y-Vibration",
                "mm/s",
                "Detects imbalance or misalignment in the second stage.",
            ),
            row(
                "LOUP",
                "99-P-11",
                "Rotary",
                "TI2360C",
                "2nd Stage Casing Temp",
                "°C",
                "Measures temperature on the pump casing.",
            ),
            row(
                "SEU1-3",
                "SEU1-P-01",
                "Pump",
                "SE1-VI-001A",
                "Motor Vibration X",
                "mm/s",
                "Primary motor vibration sensor.",
            ),
            row(
                "SEU1-3",
                "SEU2-C-05",
                "Compressor",
                "SE2-TI-105",
                "Outlet Temperature",
                "°C",
                "Measures gas temperature at the compressor outlet.",
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact tag-code lookup.
    pub fn lookup(&self, tag: &str) -> Option<&RegistryTag> {
        self.0.iter().find(|t| t.tag == tag)
    }

    /// Entries whose asset contains `token`, in registry order.
    pub fn matching_asset<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a RegistryTag> {
        self.0.iter().filter(move |t| t.asset.contains(token))
    }

    /// Case-insensitive search; an empty filter returns everything.
    pub fn search(&self, filter: &str) -> Vec<&RegistryTag> {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() {
            return self.0.iter().collect();
        }
        self.0
            .iter()
            .filter(|t| t.matches_lowercase(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_seven_tags() {
        let registry = TagRegistry::builtin();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.0[0].tag, "VI1213AA");
        assert_eq!(registry.0[6].tag, "SE2-TI-105");
    }

    #[test]
    fn test_lookup() {
        let registry = TagRegistry::builtin();
        assert_eq!(registry.lookup("TI1260A").unwrap().unit, "°C");
        assert!(registry.lookup("VI1213AB").is_none());
    }

    #[test]
    fn test_matching_asset_by_suffix() {
        let registry = TagRegistry::builtin();
        let tags: Vec<_> = registry.matching_asset("P-02").map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["VI1213AA", "TI1260A", "PI1255B"]);
        assert_eq!(registry.matching_asset("C-01").count(), 0);
    }

    #[test]
    fn test_search_case_insensitive() {
        let registry = TagRegistry::builtin();
        assert_eq!(registry.search("casing").len(), 1);
        assert_eq!(registry.search("VIBRATION").len(), 3);
        assert_eq!(registry.search("seu2").len(), 1);
        assert_eq!(registry.search("  ").len(), 7);
    }
}
