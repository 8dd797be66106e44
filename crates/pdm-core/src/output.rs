//! Command payload rendering.
//!
//! JSON is the serde form of the payload. Markdown and the one-line
//! summary come from [`Render`].

use std::fmt::Write as _;

use serde::Serialize;

use pdm_common::{AnalysisResult, Error, OutputFormat, Result, StructuredError};
use pdm_config::{ReferenceSnapshot, RefineryUnits, RegistryTag};

use crate::analysis::TagCoverage;
use crate::what_if::WhatIfOutcome;

/// Human renderings of a command payload.
pub trait Render {
    fn markdown(&self) -> String;
    fn summary(&self) -> String;
}

/// Render `value` in the requested format.
pub fn render<T: Serialize + Render>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Md => Ok(value.markdown()),
        OutputFormat::Summary => Ok(value.summary()),
    }
}

/// Render an error for stderr.
pub fn render_error(err: &Error, format: OutputFormat) -> String {
    if format.is_human() {
        err.format_human()
    } else {
        StructuredError::from(err).to_json()
    }
}

impl Render for AnalysisResult {
    fn markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Asset {}\n", self.asset_id);
        let _ = writeln!(out, "| Field | Value |");
        let _ = writeln!(out, "|---|---|");
        let _ = writeln!(out, "| Health | {} (risk {:.2}) |", self.health_state, self.risk);
        let _ = writeln!(
            out,
            "| RUL | {} days (95% CI {}-{}) |",
            self.rul_days, self.rul_ci_days[0], self.rul_ci_days[1]
        );
        let _ = writeln!(out, "| Source | {} `{}` |", self.data_source.label(), self.source_file);
        let _ = writeln!(out, "| Generated | {} |", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "| Feedback | `{}` |", self.feedback_id);

        let _ = writeln!(out, "\n## Top risk contributors\n");
        let _ = writeln!(out, "| Feature | phi | Note |");
        let _ = writeln!(out, "|---|---|---|");
        for f in &self.shap_summary {
            let _ = writeln!(
                out,
                "| {} | {:+.4} | {} |",
                f.feature,
                f.signed_phi(),
                f.note.as_deref().unwrap_or("")
            );
        }

        let _ = writeln!(out, "\n## Interpretation\n\n{}", self.explanation.plain_text);
        let _ = writeln!(out, "\n{}", self.explanation_text);
        let _ = writeln!(out, "\n**Recommendation:** {}", self.recommendation);

        let slow = self.metrics.slow_stages();
        if !slow.is_empty() {
            let _ = writeln!(out, "\n> Slow stages: {}", slow.join(", "));
        }
        out
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} (risk {:.2}), RUL {} days [{}-{}]",
            self.asset_id,
            self.health_state,
            self.risk,
            self.rul_days,
            self.rul_ci_days[0],
            self.rul_ci_days[1]
        )
    }
}

impl Render for TagCoverage {
    fn markdown(&self) -> String {
        let summary = &self.summary;
        let mut out = String::new();
        let _ = writeln!(out, "# Tag summary: {}\n", summary.asset_id);
        let origin = if summary.auto_filled {
            "Auto-Filled from Import"
        } else {
            "Manual Registry"
        };
        let _ = writeln!(out, "Source: {origin}  ");
        if let Some(src) = &self.auto_fill_source {
            let _ = writeln!(out, "Auto-fill source: `{src}`  ");
        }
        let _ = writeln!(
            out,
            "Coverage: {}%{}\n",
            summary.coverage_pct,
            if summary.coverage_pct < 100 { " (Incomplete)" } else { "" }
        );
        if summary.tags.is_empty() {
            let _ = writeln!(out, "_No tags resolved._");
            return out;
        }
        let _ = writeln!(out, "| Tag | Kind | Stage | Unit | Source | Location |");
        let _ = writeln!(out, "|---|---|---|---|---|---|");
        for t in &summary.tags {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                t.tag,
                t.kind.label(),
                t.stage,
                t.unit,
                t.source.label(),
                t.location
            );
        }
        out
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} tags ({} manual, {} auto-filled), coverage {}%",
            self.summary.asset_id,
            self.metrics.total_tags,
            self.metrics.manual_tags,
            self.metrics.auto_filled_tags,
            self.summary.coverage_pct
        )
    }
}

/// Filtered view of the Tag Registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub tags: Vec<RegistryTag>,
}

impl Render for RegistryListing {
    fn markdown(&self) -> String {
        let mut out = String::from("# Sensor Tag Registry\n\n");
        if self.tags.is_empty() {
            let _ = writeln!(
                out,
                "No tags found for \"{}\"",
                self.filter.as_deref().unwrap_or("")
            );
            return out;
        }
        let _ = writeln!(out, "| Unit | Asset | Category | Tag | Parameter | Unit of measure | Description |");
        let _ = writeln!(out, "|---|---|---|---|---|---|---|");
        for t in &self.tags {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} |",
                t.refinery_unit, t.asset, t.category, t.tag, t.parameter, t.unit, t.description
            );
        }
        out
    }

    fn summary(&self) -> String {
        match &self.filter {
            Some(f) => format!("{} tags matching \"{f}\"", self.tags.len()),
            None => format!("{} tags", self.tags.len()),
        }
    }
}

impl Render for RefineryUnits {
    fn markdown(&self) -> String {
        let mut out = String::from("# Refinery units\n");
        for unit in self.iter() {
            let _ = writeln!(out, "\n## {}\n", unit.name);
            for asset in &unit.assets {
                let _ = writeln!(out, "- {asset}");
            }
        }
        out
    }

    fn summary(&self) -> String {
        format!("{} units, {} assets", self.0.len(), self.asset_count())
    }
}

impl Render for WhatIfOutcome {
    fn markdown(&self) -> String {
        let o = &self.overrides;
        let mut out = String::new();
        let _ = writeln!(out, "# What-if: {}\n", self.asset_id);
        let _ = writeln!(out, "| Override | Value |");
        let _ = writeln!(out, "|---|---|");
        let _ = writeln!(out, "| Vibration limit | {:.1} mm/s |", o.limit_l_mm_s);
        let _ = writeln!(out, "| Trend window | {:.0} h |", o.trend_window_h);
        let _ = writeln!(out, "| RF degrading threshold | {:.2} |", o.rf_degrading_threshold);
        let _ = writeln!(out, "| RF failure threshold | {:.2} |", o.rf_failure_threshold);
        let _ = writeln!(
            out,
            "\nRUL: {} days (displayed {}), gauge {:.1}%  ",
            self.rul_days, self.displayed_rul_days, self.gauge_fill_pct
        );
        let _ = writeln!(out, "RF class at these thresholds: {}", self.rf_classification);
        if self.is_default {
            let _ = writeln!(out, "\n_All overrides at defaults._");
        }
        out
    }

    fn summary(&self) -> String {
        format!(
            "{}: RUL {} days (was {}), RF {}",
            self.asset_id, self.rul_days, self.displayed_rul_days, self.rf_classification
        )
    }
}

impl Render for ReferenceSnapshot {
    fn markdown(&self) -> String {
        let s = &self.summary;
        let mut out = String::from("# Reference data\n\n");
        let _ = writeln!(out, "- Source: {}", self.source);
        if let Some(path) = &self.path {
            let _ = writeln!(out, "- Path: `{path}`");
        }
        let _ = writeln!(out, "- Schema version: {}", self.schema_version);
        let _ = writeln!(out, "- Content hash: `{}`", self.content_hash);
        let _ = writeln!(out, "- Registry tags: {}", s.registry_tags);
        let _ = writeln!(out, "- Units: {} ({} assets)", s.refinery_units, s.assets);
        let _ = writeln!(out, "- Manual lists: {} assets, {} tags", s.manual_assets, s.manual_tags);
        let _ = writeln!(out, "- Default limit: {} mm/s", s.default_limit_mm_s);
        let _ = writeln!(
            out,
            "- RF thresholds: degrading {}, failure {}",
            s.rf_degrading_default, s.rf_failure_default
        );
        out
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.source, &self.content_hash[..self.content_hash.len().min(12)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisGenerator;
    use pdm_common::ImportMode;
    use pdm_config::{ReferenceData, ReferencePath};

    fn result() -> AnalysisResult {
        AnalysisGenerator::builtin()
            .generate("99 P-02", ImportMode::Phd)
            .unwrap()
    }

    #[test]
    fn test_json_is_serde_form() {
        let r = result();
        let json = render(&r, OutputFormat::Json).unwrap();
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back["asset_id"], "99 P-02");
        assert!(back.get("health_state").is_some());
    }

    #[test]
    fn test_summary_is_one_line() {
        let s = render(&result(), OutputFormat::Summary).unwrap();
        assert!(s.starts_with("99 P-02: "));
        assert!(!s.contains('\n'));
    }

    #[test]
    fn test_markdown_lists_every_shap_feature() {
        let r = result();
        let md = r.markdown();
        for f in &r.shap_summary {
            assert!(md.contains(&f.feature));
        }
        assert!(md.contains(&r.recommendation));
    }

    #[test]
    fn test_empty_registry_listing() {
        let listing = RegistryListing {
            filter: Some("zzz".to_string()),
            tags: Vec::new(),
        };
        assert!(listing.markdown().contains("No tags found for \"zzz\""));
        assert_eq!(listing.summary(), "0 tags matching \"zzz\"");
    }

    #[test]
    fn test_units_summary() {
        let units = &ReferenceData::builtin().refinery_units;
        assert_eq!(units.summary(), "4 units, 11 assets");
        assert!(units.markdown().contains("- 99 P-02"));
    }

    #[test]
    fn test_snapshot_summary_names_source() {
        let snap =
            ReferenceSnapshot::new(ReferenceData::builtin(), &ReferencePath::default()).unwrap();
        assert!(snap.summary().starts_with("builtin default ("));
    }

    #[test]
    fn test_render_error_formats() {
        let err = Error::InvalidInput("asset selection is empty".into());
        let json = render_error(&err, OutputFormat::Json);
        assert!(json.contains(r#""code":10"#));
        let human = render_error(&err, OutputFormat::Summary);
        assert!(human.contains("Reason: invalid input: asset selection is empty"));
    }
}
