//! CLI payload formats.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a command prints its payload on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty JSON of the payload (default)
    #[default]
    Json,

    /// Markdown tables for reading in a terminal or pasting into tickets
    Md,

    /// A single status line
    Summary,
}

impl OutputFormat {
    /// Markdown and summary are meant for people, not parsers.
    pub fn is_human(&self) -> bool {
        !matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Md => "md",
            OutputFormat::Summary => "summary",
        })
    }
}
