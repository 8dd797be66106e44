//! Curated per-asset vibration and temperature tag lists.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A curated tag definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManualTagDef {
    pub tag: String,
    pub location: String,
    pub stage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ManualAssetTagSet {
    pub vibration: Vec<ManualTagDef>,
    pub temperature: Vec<ManualTagDef>,
}

impl ManualAssetTagSet {
    pub fn len(&self) -> usize {
        self.vibration.len() + self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every definition, vibration first.
    pub fn all(&self) -> impl Iterator<Item = &ManualTagDef> {
        self.vibration.iter().chain(self.temperature.iter())
    }
}

/// Manual map keyed by the exact asset id (`99 P-02`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ManualAssetTags(pub BTreeMap<String, ManualAssetTagSet>);

/// Stage layout shared by the built-in pumps: `(prefix, stage, location)`.
const VIBRATION_LAYOUT: [(&str, &str, &str); 6] = [
    ("13AA", "1X", "1st Stage X"),
    ("13AB", "1Y", "1st Stage Y"),
    ("13AC", "1Z", "1st Stage Z"),
    ("14AA", "2X", "2nd Stage X"),
    ("14AB", "2Y", "2nd Stage Y"),
    ("14AC", "2Z", "2nd Stage Z"),
];

const TEMPERATURE_LAYOUT: [(&str, &str, &str); 6] = [
    ("60A", "1M", "1st Stage Motor Bearing"),
    ("61A", "1I", "1st Stage Impeller Bearing"),
    ("62A", "1M2", "1st Stage Motor Bearing 2"),
    ("63A", "2M", "2nd Stage Motor Bearing"),
    ("64A", "2I", "2nd Stage Impeller Bearing"),
    ("65A", "2M2", "2nd Stage Motor Bearing 2"),
];

/// Tag set for a pump whose codes start `VI<loop>` / `TI<loop>`.
fn pump_tags(loop_id: &str) -> ManualAssetTagSet {
    let def = |tag: String, stage: &str, location: &str| ManualTagDef {
        tag,
        location: location.to_string(),
        stage: stage.to_string(),
    };
    ManualAssetTagSet {
        vibration: VIBRATION_LAYOUT
            .iter()
            .map(|&(code, stage, loc)| def(format!("VI{loop_id}{code}"), stage, loc))
            .collect(),
        temperature: TEMPERATURE_LAYOUT
            .iter()
            .map(|&(code, stage, loc)| def(format!("TI{loop_id}{code}"), stage, loc))
            .collect(),
    }
}

impl ManualAssetTags {
    pub fn builtin() -> Self {
        let mut map = BTreeMap::new();
        map.insert("99 P-02".to_string(), pump_tags("12"));
        map.insert("99 P-11".to_string(), pump_tags("23"));
        ManualAssetTags(map)
    }

    /// Exact-key lookup.
    pub fn get(&self, asset: &str) -> Option<&ManualAssetTagSet> {
        self.0.get(asset)
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p02_codes() {
        let tags = ManualAssetTags::builtin();
        let set = tags.get("99 P-02").unwrap();
        let vib: Vec<_> = set.vibration.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(
            vib,
            vec!["VI1213AA", "VI1213AB", "VI1213AC", "VI1214AA", "VI1214AB", "VI1214AC"]
        );
        let temp: Vec<_> = set.temperature.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(
            temp,
            vec!["TI1260A", "TI1261A", "TI1262A", "TI1263A", "TI1264A", "TI1265A"]
        );
        assert_eq!(set.len(), 12);
    }

    #[test]
    fn test_p11_codes() {
        let tags = ManualAssetTags::builtin();
        let set = tags.get("99 P-11").unwrap();
        assert_eq!(set.vibration[0].tag, "VI2313AA");
        assert_eq!(set.vibration[5].tag, "VI2314AC");
        assert_eq!(set.temperature[0].tag, "TI2360A");
        assert_eq!(set.temperature[5].tag, "TI2365A");
        assert_eq!(set.temperature[2].stage, "1M2");
        assert_eq!(set.temperature[2].location, "1st Stage Motor Bearing 2");
    }

    #[test]
    fn test_exact_key_only() {
        let tags = ManualAssetTags::builtin();
        assert!(tags.get("99-P-02").is_none());
        assert!(tags.get("99 P-0").is_none());
        assert_eq!(tags.assets().count(), 2);
    }
}
