//! Tag-coverage resolution.
//!
//! Curated manual lists win. Otherwise tags are auto-filled from the Tag
//! Registry by matching the asset's suffix token against registry asset
//! names; only `VI*` and `TI*` codes are kept. An asset with no tags at all
//! resolves to an empty, 0% summary rather than an error.

use pdm_common::{
    AssetId, AssetSummaryTag, AssetTagSummary, ImportMode, TagInfo, TagKind, TagSource,
    TagSummaryMetrics,
};
use pdm_config::{ManualAssetTagSet, ReferenceData, RegistryTag, TagRegistry};
use schemars::JsonSchema;
use serde::Serialize;

/// Unit shown for a manual tag missing from the registry.
pub const UNKNOWN_UNIT: &str = "unknown";

/// Stage label of auto-filled tags.
pub const AUTO_STAGE: &str = "Auto";

/// Resolved coverage for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TagCoverage {
    pub summary: AssetTagSummary,
    pub metrics: TagSummaryMetrics,
    /// Where auto-filled tags came from; `None` for manual lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fill_source: Option<String>,
}

/// Resolve the coverage table for `asset`.
pub fn resolve_tag_coverage(
    asset: &AssetId,
    mode: ImportMode,
    reference: &ReferenceData,
) -> TagCoverage {
    let (tags, auto_filled) = match reference.manual_asset_tags.get(asset.as_str()) {
        Some(set) => (manual_tags(set, &reference.tag_registry), false),
        None => (auto_fill_tags(asset, &reference.tag_registry), true),
    };

    let summary = AssetTagSummary {
        asset_id: asset.clone(),
        coverage_pct: AssetTagSummary::coverage_for(&tags),
        tags,
        auto_filled,
    };
    let metrics = TagSummaryMetrics::from_summary(&summary);
    let auto_fill_source = auto_filled.then(|| auto_fill_source(asset, mode));

    tracing::debug!(
        asset = %asset,
        auto_filled,
        tags = summary.tags.len(),
        coverage_pct = summary.coverage_pct,
        "resolved tag coverage"
    );

    TagCoverage {
        summary,
        metrics,
        auto_fill_source,
    }
}

fn manual_tags(set: &ManualAssetTagSet, registry: &TagRegistry) -> Vec<AssetSummaryTag> {
    let row = |kind: TagKind| {
        move |def: &pdm_config::ManualTagDef| AssetSummaryTag {
            tag: def.tag.clone(),
            kind,
            stage: def.stage.clone(),
            unit: registry
                .lookup(&def.tag)
                .map_or_else(|| UNKNOWN_UNIT.to_string(), |t| t.unit.clone()),
            source: TagSource::Manual,
            location: def.location.clone(),
        }
    };

    set.vibration
        .iter()
        .map(row(TagKind::Vibration))
        .chain(set.temperature.iter().map(row(TagKind::Temperature)))
        .collect()
}

fn auto_fill_tags(asset: &AssetId, registry: &TagRegistry) -> Vec<AssetSummaryTag> {
    let Some(token) = asset.suffix_token() else {
        return Vec::new();
    };

    registry
        .matching_asset(token)
        .filter_map(|entry| {
            let kind = TagKind::from_tag_code(&entry.tag)?;
            Some(AssetSummaryTag {
                tag: entry.tag.clone(),
                kind,
                stage: AUTO_STAGE.to_string(),
                unit: entry.unit.clone(),
                source: TagSource::AutoFill,
                location: entry.parameter.clone(),
            })
        })
        .collect()
}

fn auto_fill_source(asset: &AssetId, mode: ImportMode) -> String {
    match mode {
        ImportMode::Phd => format!("phd://loup/{}", asset.hyphenated()),
        ImportMode::Csv => ImportMode::Csv.label().to_string(),
    }
}

/// Registry tags used as model inputs: the suffix matches, first
/// `floor(draw * 2) + 2` of them.
pub fn tracked_tags(asset: &AssetId, registry: &TagRegistry, draw: f64) -> Vec<TagInfo> {
    let Some(token) = asset.suffix_token() else {
        return Vec::new();
    };
    let take = (draw * 2.0).floor() as usize + 2;

    registry
        .matching_asset(token)
        .take(take)
        .map(tag_info)
        .collect()
}

fn tag_info(entry: &RegistryTag) -> TagInfo {
    TagInfo {
        tag: entry.tag.clone(),
        parameter: entry.parameter.clone(),
        unit: entry.unit.clone(),
        used_in_model: true,
        description: Some(entry.description.clone()),
        category: Some(entry.category.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(id: &str) -> TagCoverage {
        resolve_tag_coverage(
            &AssetId::parse(id).unwrap(),
            ImportMode::Phd,
            ReferenceData::builtin(),
        )
    }

    #[test]
    fn test_manual_asset_uses_curated_list() {
        let coverage = resolve("99 P-02");
        assert!(!coverage.summary.auto_filled);
        assert_eq!(coverage.summary.tags.len(), 12);
        assert_eq!(coverage.summary.coverage_pct, 100);
        assert_eq!(coverage.metrics.manual_tags, 12);
        assert_eq!(coverage.metrics.auto_filled_tags, 0);
        assert!(coverage.auto_fill_source.is_none());
        assert!(coverage
            .summary
            .tags
            .iter()
            .all(|t| t.source == TagSource::Manual));
    }

    #[test]
    fn test_manual_units_from_registry_or_unknown() {
        let coverage = resolve("99 P-02");
        let unit_of = |code: &str| {
            coverage
                .summary
                .tags
                .iter()
                .find(|t| t.tag == code)
                .map(|t| t.unit.as_str())
        };
        assert_eq!(unit_of("VI1213AA"), Some("mm/s"));
        assert_eq!(unit_of("TI1260A"), Some("°C"));
        assert_eq!(unit_of("VI1213AB"), Some(UNKNOWN_UNIT));
    }

    #[test]
    fn test_manual_tags_keep_list_order() {
        let coverage = resolve("99 P-11");
        let tags = &coverage.summary.tags;
        assert_eq!(tags[0].tag, "VI2313AA");
        assert_eq!(tags[0].kind, TagKind::Vibration);
        assert_eq!(tags[6].tag, "TI2360A");
        assert_eq!(tags[6].kind, TagKind::Temperature);
        assert_eq!(tags[6].stage, "1M");
    }

    #[test]
    fn test_no_suffix_is_empty_not_error() {
        let coverage = resolve("SEU3-P-10");
        assert!(coverage.summary.tags.is_empty());
        assert!(coverage.summary.auto_filled);
        assert_eq!(coverage.summary.coverage_pct, 0);
        assert_eq!(coverage.metrics.total_tags, 0);
    }

    #[test]
    fn test_auto_fill_drops_non_vi_ti() {
        let mut reference = ReferenceData::builtin().clone();
        reference.manual_asset_tags.0.clear();
        let coverage = resolve_tag_coverage(
            &AssetId::parse("99 P-02").unwrap(),
            ImportMode::Phd,
            &reference,
        );
        let codes: Vec<_> = coverage.summary.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(codes, vec!["VI1213AA", "TI1260A"]);
        assert_eq!(coverage.summary.coverage_pct, 100);
        assert_eq!(coverage.summary.tags[0].stage, AUTO_STAGE);
        assert_eq!(coverage.summary.tags[0].location, "1st Stage X-Vibration");
        assert_eq!(coverage.metrics.auto_filled_tags, 2);
        assert_eq!(
            coverage.auto_fill_source.as_deref(),
            Some("phd://loup/99-P-02")
        );
    }

    #[test]
    fn test_auto_fill_matches_only_second_token() {
        let coverage = resolve("ZZ P-02 spare");
        let codes: Vec<_> = coverage.summary.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(codes, vec!["VI1213AA", "TI1260A"]);
        assert_eq!(coverage.summary.coverage_pct, 100);

        let id = AssetId::parse("ZZ P-02 spare").unwrap();
        assert_eq!(tracked_tags(&id, &TagRegistry::builtin(), 0.2).len(), 2);
    }

    #[test]
    fn test_auto_fill_vibration_only_is_half_covered() {
        let mut reference = ReferenceData::builtin().clone();
        reference.manual_asset_tags.0.clear();
        reference.tag_registry.0.retain(|t| !t.tag.starts_with("TI"));
        let coverage = resolve_tag_coverage(
            &AssetId::parse("99 P-02").unwrap(),
            ImportMode::Phd,
            &reference,
        );
        let codes: Vec<_> = coverage.summary.tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(codes, vec!["VI1213AA"]);
        assert_eq!(coverage.summary.coverage_pct, 50);
    }

    #[test]
    fn test_manual_list_without_temperature_is_half_covered() {
        let mut reference = ReferenceData::builtin().clone();
        let set = reference
            .manual_asset_tags
            .0
            .get_mut("99 P-02")
            .expect("builtin manual list");
        set.temperature.clear();
        let vibration = set.vibration.len();
        let coverage = resolve_tag_coverage(
            &AssetId::parse("99 P-02").unwrap(),
            ImportMode::Phd,
            &reference,
        );
        assert!(!coverage.summary.auto_filled);
        assert_eq!(coverage.summary.tags.len(), vibration);
        assert_eq!(coverage.summary.coverage_pct, 50);
    }

    #[test]
    fn test_auto_fill_source_for_csv() {
        let coverage = resolve_tag_coverage(
            &AssetId::parse("99 C-01").unwrap(),
            ImportMode::Csv,
            ReferenceData::builtin(),
        );
        assert!(coverage.summary.tags.is_empty());
        assert_eq!(coverage.auto_fill_source.as_deref(), Some("CSV Upload"));
    }

    #[test]
    fn test_tracked_tags_count() {
        let registry = TagRegistry::builtin();
        let id = AssetId::parse("99 P-02").unwrap();
        assert_eq!(tracked_tags(&id, &registry, 0.2).len(), 2);
        assert_eq!(tracked_tags(&id, &registry, 0.7).len(), 3);
        assert!(tracked_tags(&id, &registry, 0.7).iter().all(|t| t.used_in_model));

        let p11 = AssetId::parse("99 P-11").unwrap();
        assert_eq!(tracked_tags(&p11, &registry, 0.9).len(), 2);

        let bare = AssetId::parse("SEU3-P-10").unwrap();
        assert!(tracked_tags(&bare, &registry, 0.9).is_empty());
    }
}
