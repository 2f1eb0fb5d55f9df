//! Report settings, loadable from TOML.
//!
//! ```toml
//! padding = 10
//! innovator_threshold = 5
//! significance_level = 0.05
//!
//! [footer]
//! survey_url = "https://filip.kcn.pl"
//! credentials = "Username: Survey | Password: Filip"
//! repository_url = "https://github.com/filipmoz/marketing"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use surveybook_core::{DEFAULT_INNOVATOR_THRESHOLD, SCALE_MAX, SCALE_MIN};
use thiserror::Error;

/// Rows reserved below the data in every formula range
pub const DEFAULT_PADDING: u32 = 10;

pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Largest accepted padding; keeps the Helper Data blocks inside the sheet row limit
pub const MAX_PADDING: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Contact block written below the content of every sheet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub survey_url: String,
    pub credentials: String,
    pub repository_url: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            survey_url: "https://filip.kcn.pl".into(),
            credentials: "Username: Survey | Password: Filip".into(),
            repository_url: "https://github.com/filipmoz/marketing".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Extra rows in every formula range beyond the response count
    pub padding: u32,
    /// Innovator scores at or above this are "High"
    pub innovator_threshold: u8,
    /// α used by every conclusion formula
    pub significance_level: f64,
    pub footer: FooterConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            innovator_threshold: DEFAULT_INNOVATOR_THRESHOLD,
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            footer: FooterConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Both buckets must be non-empty
        if !(SCALE_MIN + 1..=SCALE_MAX).contains(&self.innovator_threshold) {
            return Err(ConfigError::Invalid(format!(
                "innovator_threshold must be between {} and {SCALE_MAX}, got {}",
                SCALE_MIN + 1,
                self.innovator_threshold
            )));
        }
        if self.padding > MAX_PADDING {
            return Err(ConfigError::Invalid(format!(
                "padding must be at most {MAX_PADDING}, got {}",
                self.padding
            )));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }
        Ok(())
    }
}
