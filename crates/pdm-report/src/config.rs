//! Report configuration types.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    Light,
    /// The dashboard's native palette.
    #[default]
    Dark,
    /// Follow the system preference.
    Auto,
}

impl ReportTheme {
    /// CSS class on the root element.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// Which dashboard cards are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSections {
    #[serde(default = "default_true")]
    pub rul_gauge: bool,
    #[serde(default = "default_true")]
    pub health: bool,
    #[serde(default = "default_true")]
    pub explanation: bool,
    #[serde(default = "default_true")]
    pub model_internals: bool,
    #[serde(default = "default_true")]
    pub shap: bool,
    #[serde(default = "default_true")]
    pub recommendation: bool,
    #[serde(default = "default_true")]
    pub import_info: bool,
    #[serde(default = "default_true")]
    pub tracked_tags: bool,
    #[serde(default = "default_true")]
    pub performance: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportSections {
    fn default() -> Self {
        Self {
            rul_gauge: true,
            health: true,
            explanation: true,
            model_internals: true,
            shap: true,
            recommendation: true,
            import_info: true,
            tracked_tags: true,
            performance: true,
        }
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Page title; defaults to the application name.
    pub title: Option<String>,
    #[serde(default)]
    pub theme: ReportTheme,
    #[serde(default)]
    pub sections: ReportSections,
    /// RUL at which the gauge ring is full.
    #[serde(default = "default_gauge_max_days")]
    pub gauge_max_days: u32,
    /// Minify the rendered HTML.
    #[serde(default)]
    pub minify: bool,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

fn default_gauge_max_days() -> u32 {
    pdm_math::MAX_RUL_DAYS
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: None,
            theme: ReportTheme::default(),
            sections: ReportSections::default(),
            gauge_max_days: default_gauge_max_days(),
            minify: false,
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_sections(mut self, sections: ReportSections) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_gauge_max_days(mut self, days: u32) -> Self {
        self.gauge_max_days = days;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Page title.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Predictive Maintenance AI")
    }

    pub fn validate(&self) -> Result<()> {
        if self.gauge_max_days == 0 {
            return Err(ReportError::InvalidConfig(
                "gauge_max_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.schema_version, "1.0.0");
        assert_eq!(config.theme, ReportTheme::Dark);
        assert_eq!(config.gauge_max_days, 120);
        assert!(config.sections.shap);
        assert_eq!(config.title(), "Predictive Maintenance AI");
    }

    #[test]
    fn test_config_builder() {
        let config = ReportConfig::new()
            .with_title("Unit 99 Pumps")
            .with_theme(ReportTheme::Light)
            .with_gauge_max_days(60);

        assert_eq!(config.title(), "Unit 99 Pumps");
        assert_eq!(config.theme, ReportTheme::Light);
        assert_eq!(config.gauge_max_days, 60);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            ReportConfig::from_json(r#"{"title": null, "sections": {"performance": false}}"#)
                .unwrap();
        assert!(!config.sections.performance);
        assert!(config.sections.rul_gauge);
        assert_eq!(config.gauge_max_days, 120);
    }

    #[test]
    fn test_zero_gauge_rejected() {
        let err = ReportConfig::from_json(r#"{"title": null, "gauge_max_days": 0}"#).unwrap_err();
        assert!(matches!(err, ReportError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = ReportConfig::default().with_theme(ReportTheme::Auto);
        let json = config.to_json().unwrap();
        let parsed = ReportConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
