//! Structured event vocabulary.
//!
//! Every JSONL line carries `ts`, `level`, `event`, `run_id` and `stage`;
//! import events additionally carry the asset and the import ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Where in the import → analyze → render flow an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    /// Historian fetch or CSV parse, including simulated latency.
    Import,
    /// Analysis generation.
    Analyze,
    /// What-if recalculation.
    Override,
    /// Dashboard rendering and command output.
    Render,
    /// Reference data resolution and validation.
    Config,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Import => "import",
            Stage::Analyze => "analyze",
            Stage::Override => "override",
            Stage::Render => "render",
            Stage::Config => "config",
        };
        f.write_str(s)
    }
}

/// Event names; used as the tracing target so JSONL consumers can filter.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const IMPORT_STARTED: &str = "import.started";
    pub const IMPORT_PROGRESS: &str = "import.progress";
    pub const IMPORT_APPLIED: &str = "import.applied";
    pub const IMPORT_SUPERSEDED: &str = "import.superseded";
    pub const IMPORT_REJECTED: &str = "import.rejected";

    pub const ANALYSIS_GENERATED: &str = "analysis.generated";
    pub const ANALYSIS_FAILED: &str = "analysis.failed";

    pub const OVERRIDE_APPLIED: &str = "override.applied";
    pub const OVERRIDE_REJECTED: &str = "override.rejected";

    pub const REPORT_RENDERED: &str = "report.rendered";
}

/// A structured event, serializable as one JSONL line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,
    pub level: Level,
    pub event: String,
    pub run_id: String,
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogEvent {
    pub fn new(
        level: Level,
        event: impl Into<String>,
        run_id: impl Into<String>,
        stage: Stage,
        message: impl Into<String>,
    ) -> Self {
        LogEvent {
            ts: Utc::now(),
            level,
            event: event.into(),
            run_id: run_id.into(),
            stage,
            asset: None,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Add a field; values that fail to serialize are dropped.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.event
            )
        })
    }
}

/// Per-invocation correlation data.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    /// Asset currently being imported, if any.
    pub asset: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            asset: None,
        }
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    pub fn event(
        &self,
        level: Level,
        event: impl Into<String>,
        stage: Stage,
        message: impl Into<String>,
    ) -> LogEvent {
        let e = LogEvent::new(level, event, &self.run_id, stage, message);
        match &self.asset {
            Some(asset) => e.with_asset(asset.clone()),
            None => e,
        }
    }

    pub fn info(&self, event: impl Into<String>, stage: Stage, message: impl Into<String>) -> LogEvent {
        self.event(Level::Info, event, stage, message)
    }

    pub fn warn(&self, event: impl Into<String>, stage: Stage, message: impl Into<String>) -> LogEvent {
        self.event(Level::Warn, event, stage, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = LogContext::new("run-abc")
            .with_asset("99 P-02")
            .info(event_names::IMPORT_STARTED, Stage::Import, "Connecting to historian...")
            .with_field("ticket", 3);

        let json = event.to_jsonl();
        assert!(json.contains(r#""event":"import.started""#));
        assert!(json.contains(r#""level":"info""#));
        assert!(json.contains(r#""stage":"import""#));
        assert!(json.contains(r#""asset":"99 P-02""#));
        assert!(json.contains(r#""ticket":3"#));
    }

    #[test]
    fn test_asset_omitted_when_unset() {
        let event = LogContext::new("run-abc").warn(
            event_names::CONFIG_ERROR,
            Stage::Config,
            "bad file",
        );
        assert_eq!(event.level, Level::Warn);
        assert!(!event.to_jsonl().contains("asset"));
    }

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Import,
            Stage::Analyze,
            Stage::Override,
            Stage::Render,
            Stage::Config,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{stage}\""));
        }
    }
}
