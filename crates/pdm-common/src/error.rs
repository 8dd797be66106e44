//! Error types for the predictive-maintenance workspace.
//!
//! Every failure is scoped to a single import action: the dashboard stays
//! usable and the user may re-trigger the import. Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for grouping
//! - Recoverability hints and a human remediation line
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Input
//!   Reason: asset id must not be empty
//!   Fix: Select a refinery unit and an asset before importing
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rejected user input (asset selection, override values).
    Input,
    /// Failures while generating an analysis.
    Analysis,
    /// Reference data and configuration errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("override '{name}' is display-only and cannot be changed")]
    OverrideDisabled { name: String },

    #[error("override '{name}' value {value} outside [{min}, {max}]")]
    OverrideOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    // Analysis errors (20-29)
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (40-49)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Analysis errors
    /// - 30-39: Configuration errors
    /// - 40-49: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidInput(_) => 10,
            Error::OverrideDisabled { .. } => 11,
            Error::OverrideOutOfRange { .. } => 12,

            Error::AnalysisFailed(_) => 20,

            Error::Config(_) => 30,

            Error::Io(_) => 40,
            Error::Json(_) => 41,
        }
    }

    /// Returns the category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidInput(_)
            | Error::OverrideDisabled { .. }
            | Error::OverrideOutOfRange { .. } => ErrorCategory::Input,
            Error::AnalysisFailed(_) => ErrorCategory::Analysis,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether the user can recover by re-triggering the action.
    ///
    /// Input errors block submission until corrected; analysis failures
    /// leave the dashboard usable for a manual retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidInput(_)
            | Error::OverrideDisabled { .. }
            | Error::OverrideOutOfRange { .. }
            | Error::AnalysisFailed(_) => true,
            Error::Config(_) => true,
            Error::Io(_) | Error::Json(_) => false,
        }
    }

    /// True for the errors that are shown inline next to the control that
    /// produced them instead of replacing the dashboard panel.
    pub fn is_inline(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    /// Human-readable remediation line.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "Select a refinery unit and an asset before importing",
            Error::OverrideDisabled { .. } => "This control is informational; adjust another override",
            Error::OverrideOutOfRange { .. } => "Choose a value inside the slider range",
            Error::AnalysisFailed(_) => "Re-run the import; the previous result was discarded",
            Error::Config(_) => "Run 'pdm-core config validate' on the reference data file",
            Error::Io(_) => "Check file paths and permissions",
            Error::Json(_) => "Check that the file contains valid JSON",
        }
    }

    /// Short headline for display.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "Invalid Input",
            Error::OverrideDisabled { .. } => "Override Disabled",
            Error::OverrideOutOfRange { .. } => "Override Out Of Range",
            Error::AnalysisFailed(_) => "Analysis Failed",
            Error::Config(_) => "Configuration Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Three-line human rendering: headline, reason, fix.
    pub fn format_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (override name, bounds).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::OverrideDisabled { name } => {
                context.insert("override".to_string(), serde_json::json!(name));
            }
            Error::OverrideOutOfRange {
                name,
                value,
                min,
                max,
            } => {
                context.insert("override".to_string(), serde_json::json!(name));
                context.insert("value".to_string(), serde_json::json!(value));
                context.insert("min".to_string(), serde_json::json!(min));
                context.insert("max".to_string(), serde_json::json!(max));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_grouped_by_category() {
        assert_eq!(Error::InvalidInput("x".into()).code(), 10);
        assert_eq!(Error::AnalysisFailed("x".into()).code(), 20);
        assert_eq!(Error::Config("x".into()).code(), 30);
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), 40);
        assert_eq!(io.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_input_errors_are_inline() {
        assert!(Error::InvalidInput("empty".into()).is_inline());
        assert!(Error::OverrideDisabled {
            name: "trend_window_h".into()
        }
        .is_inline());
        assert!(!Error::AnalysisFailed("boom".into()).is_inline());
    }

    #[test]
    fn test_analysis_failure_is_recoverable() {
        let err = Error::AnalysisFailed("boom".into());
        assert!(err.is_recoverable());
        assert_eq!(err.headline(), "Analysis Failed");
    }

    #[test]
    fn test_format_human() {
        let text = Error::InvalidInput("asset id must not be empty".into()).format_human();
        assert!(text.starts_with("✗ Invalid Input"));
        assert!(text.contains("Reason: invalid input: asset id must not be empty"));
        assert!(text.contains("Fix: "));
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::OverrideOutOfRange {
            name: "limit_L_mm_s".into(),
            value: 12.0,
            min: 6.0,
            max: 9.6,
        };
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 12);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert_eq!(structured.context["override"], "limit_L_mm_s");

        let json = structured.to_json();
        assert!(json.contains("\"category\":\"input\""));
    }
}
