//! Sensor tag records attached to an analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::id::AssetId;

/// A registry tag actually used as a model input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TagInfo {
    pub tag: String,
    pub parameter: String,
    pub unit: String,
    pub used_in_model: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Measurement kind of a summary tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Vibration,
    Temperature,
}

impl TagKind {
    /// Classify a tag code by prefix: `VI*` vibration, `TI*` temperature.
    pub fn from_tag_code(tag: &str) -> Option<Self> {
        if tag.starts_with("VI") {
            Some(TagKind::Vibration)
        } else if tag.starts_with("TI") {
            Some(TagKind::Temperature)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TagKind::Vibration => "Vibration",
            TagKind::Temperature => "Temperature",
        }
    }
}

/// Where a summary tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    /// Curated per-asset list.
    Manual,
    /// Synthesized from the Tag Registry by suffix match.
    AutoFill,
}

impl TagSource {
    pub fn label(&self) -> &'static str {
        match self {
            TagSource::Manual => "Manual",
            TagSource::AutoFill => "Auto-Fill",
        }
    }
}

/// One row of the asset tag coverage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetSummaryTag {
    pub tag: String,
    pub kind: TagKind,
    pub stage: String,
    pub unit: String,
    pub source: TagSource,
    pub location: String,
}

/// Resolved tag coverage for an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetTagSummary {
    pub asset_id: AssetId,
    pub tags: Vec<AssetSummaryTag>,
    pub auto_filled: bool,
    /// One of 0, 50, 100.
    pub coverage_pct: u8,
}

impl AssetTagSummary {
    pub fn count_of(&self, kind: TagKind) -> usize {
        self.tags.iter().filter(|t| t.kind == kind).count()
    }

    /// 100 with both kinds present, 50 with exactly one, else 0.
    pub fn coverage_for(tags: &[AssetSummaryTag]) -> u8 {
        let has_vibration = tags.iter().any(|t| t.kind == TagKind::Vibration);
        let has_temperature = tags.iter().any(|t| t.kind == TagKind::Temperature);
        match (has_vibration, has_temperature) {
            (true, true) => 100,
            (true, false) | (false, true) => 50,
            (false, false) => 0,
        }
    }
}

/// Counts shown above the tag summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagSummaryMetrics {
    pub manual_tags: usize,
    pub auto_filled_tags: usize,
    pub total_tags: usize,
}

impl TagSummaryMetrics {
    pub fn from_summary(summary: &AssetTagSummary) -> Self {
        let manual_tags = summary
            .tags
            .iter()
            .filter(|t| t.source == TagSource::Manual)
            .count();
        let auto_filled_tags = summary.tags.len() - manual_tags;
        Self {
            manual_tags,
            auto_filled_tags,
            total_tags: summary.tags.len(),
        }
    }
}
