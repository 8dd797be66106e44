//! Reference-data path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path →
//! built-in tables.

use std::path::{Path, PathBuf};

/// Where the reference data came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using compiled-in tables.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Resolved reference-data location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePath {
    /// File to load, or `None` for the built-in tables.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_REFERENCE_PATH: &str = "PDM_REFERENCE_DATA";
pub const ENV_CONFIG_DIR: &str = "PDM_CONFIG_DIR";

/// Standard reference file name.
const REFERENCE_FILENAME: &str = "reference.json";

/// Application name for XDG directories.
const APP_NAME: &str = "pdm-dashboard";

/// Resolve the reference-data file.
///
/// 1. Explicit CLI path (always honored, so a typo surfaces as an I/O error)
/// 2. `PDM_REFERENCE_DATA`
/// 3. `PDM_CONFIG_DIR` + `reference.json`
/// 4. XDG config directory (`~/.config/pdm-dashboard/reference.json`)
/// 5. Built-in tables
pub fn resolve_reference_path(cli_path: Option<&Path>) -> ReferencePath {
    if let Some(path) = cli_path {
        return ReferencePath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_REFERENCE_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return ReferencePath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(REFERENCE_FILENAME);
        if path.exists() {
            return ReferencePath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(REFERENCE_FILENAME);
        if path.exists() {
            return ReferencePath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    ReferencePath::default()
}

/// Get the XDG config directory for the dashboard.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
