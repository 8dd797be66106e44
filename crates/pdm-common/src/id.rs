//! Asset and feedback identity types.
//!
//! Asset identifiers come straight from the unit/asset selectors, e.g.
//! `99 P-02` (site prefix, a space, then the equipment tag) or
//! `SEU3-P-10` (no space). The component after the first space is the
//! suffix token used to match the Tag Registry.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Identifier of a monitored asset (pump, compressor).
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Parse a user-selected asset id.
    ///
    /// Blank selections are rejected with [`Error::InvalidInput`].
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "asset id must not be empty".to_string(),
            ));
        }
        Ok(AssetId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Second space-delimited component, if any.
    ///
    /// `"99 P-02"` yields `Some("P-02")`, `"99 P-02 spare"` also yields
    /// `Some("P-02")`, and `"SEU3-P-10"` yields `None`.
    pub fn suffix_token(&self) -> Option<&str> {
        self.0.split(' ').nth(1).filter(|token| !token.is_empty())
    }

    /// Asset id with its first space replaced by `-` (historian paths).
    pub fn hyphenated(&self) -> String {
        self.0.replacen(' ', "-", 1)
    }

    /// Asset id with its first space replaced by `_` (upload file names).
    pub fn underscored(&self) -> String {
        self.0.replacen(' ', "_", 1)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Feedback handle attached to every analysis.
///
/// Format: `fbk_YYYYMMDDTHHMMSSZ`
/// Example: `fbk_20260115T143022Z`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

impl FeedbackId {
    /// Derive the feedback id for an analysis produced at `timestamp`.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        FeedbackId(format!("fbk_{}", timestamp.format("%Y%m%dT%H%M%SZ")))
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
