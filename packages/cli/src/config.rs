//! Pipeline configuration loaded from TOML.
//!
//! The default configuration is embedded at compile time from
//! `config/default.toml`. A user-supplied file replaces it entirely.

use std::path::Path;

use crime_link_graph_models::DEFAULT_THRESHOLD;
use crime_link_profile_models::ProfileConfig;
use crime_link_similarity::SimilarityConfig;
use serde::{Deserialize, Serialize};

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Threshold outside `[0, 1]`.
    #[error("Invalid threshold {0}: must be between 0 and 1")]
    Threshold(f64),

    /// An age bin other than the last has no upper bound.
    #[error("Age group '{0}' has no max_age but is not the last bin")]
    OpenAgeBin(String),
}

/// Graph construction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Minimum similarity for an edge.
    pub threshold: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Full configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Profile label sets and neighbor count.
    pub profile: ProfileConfig,
    /// Feature selection and weights.
    pub similarity: SimilarityConfig,
    /// Edge threshold.
    pub graph: GraphConfig,
}

impl PipelineConfig {
    /// Parses and validates a TOML config string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is out
    /// of range.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Loads `path`, or the embedded default when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::embedded();
        };

        log::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Replaces the edge threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Threshold`] if `threshold` is outside `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        self.graph.threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.graph.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Threshold(threshold));
        }

        let bins = &self.profile.age_groups;
        if let Some(open) = bins
            .iter()
            .take(bins.len().saturating_sub(1))
            .find(|bin| bin.max_age.is_none())
        {
            return Err(ConfigError::OpenAgeBin(open.label.clone()));
        }

        Ok(())
    }
}
