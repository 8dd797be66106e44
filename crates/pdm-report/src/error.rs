//! Error types for dashboard rendering.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while rendering the dashboard.
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ReportError> for pdm_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::JsonError(e) => pdm_common::Error::Json(e),
            ReportError::IoError(e) => pdm_common::Error::Io(e),
            ReportError::InvalidConfig(msg) => pdm_common::Error::Config(msg),
        }
    }
}
