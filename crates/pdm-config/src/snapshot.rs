//! Reference-data snapshots for diagnostics.
//!
//! A snapshot fingerprints the active tables so two runs can be compared
//! without diffing the JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::reference::ReferenceData;
use crate::resolve::ReferencePath;
use crate::validate::ValidationResult;

/// A frozen view of the active reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the reference data.
    pub schema_version: String,

    /// File the data was loaded from, if not built in.
    #[serde(default)]
    pub path: Option<String>,

    /// Where the data came from.
    pub source: String,

    /// SHA-256 of the canonical JSON of the whole data set.
    pub content_hash: String,

    /// Per-section hashes, for spotting which table changed.
    pub section_hashes: SectionHashes,

    pub summary: ReferenceSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHashes {
    pub tag_registry: String,
    pub refinery_units: String,
    pub manual_asset_tags: String,
    pub overrides: String,
}

/// Counts and defaults for quick reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub registry_tags: usize,
    pub refinery_units: usize,
    pub assets: usize,
    pub manual_assets: usize,
    pub manual_tags: usize,
    pub default_limit_mm_s: f64,
    pub rf_degrading_default: f64,
    pub rf_failure_default: f64,
}

impl ReferenceSnapshot {
    /// Snapshot `data` as loaded from `resolved`.
    pub fn new(data: &ReferenceData, resolved: &ReferencePath) -> ValidationResult<Self> {
        let content_hash = hash_content(&data.canonical_json()?);
        let section_hashes = SectionHashes {
            tag_registry: hash_value(&data.tag_registry),
            refinery_units: hash_value(&data.refinery_units),
            manual_asset_tags: hash_value(&data.manual_asset_tags),
            overrides: hash_value(&data.overrides),
        };

        Ok(ReferenceSnapshot {
            timestamp: Utc::now(),
            schema_version: data.schema_version.clone(),
            path: resolved.path.as_ref().map(|p| p.display().to_string()),
            source: resolved.source.to_string(),
            content_hash,
            section_hashes,
            summary: build_summary(data),
        })
    }

    /// Whether two snapshots describe the same tables.
    pub fn same_content(&self, other: &ReferenceSnapshot) -> bool {
        self.content_hash == other.content_hash
    }
}

fn build_summary(data: &ReferenceData) -> ReferenceSummary {
    ReferenceSummary {
        registry_tags: data.tag_registry.len(),
        refinery_units: data.refinery_units.0.len(),
        assets: data.refinery_units.asset_count(),
        manual_assets: data.manual_asset_tags.0.len(),
        manual_tags: data.manual_asset_tags.0.values().map(|s| s.len()).sum(),
        default_limit_mm_s: data.overrides.limit_l_mm_s.default,
        rf_degrading_default: data.overrides.rf_degrading_threshold.default,
        rf_failure_default: data.overrides.rf_failure_threshold.default,
    }
}

/// SHA-256 hex digest of a string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn hash_value<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => hash_content(&json),
        Err(_) => hash_content(""),
    }
}
