//! Loading [`PipelineConfig`] from TOML.
//!
//! Every field is optional in the file; missing values fall back to the
//! defaults (Web Mercator latitude range, `1e-10` epsilon, east-home
//! uniform dateline repair). Command-line flags are applied on top with
//! [`ConfigOverrides`].

use std::path::Path;

use ixstats_sanitize_models::{DatelineStrategy, Hemisphere, LatitudePolicy, PipelineConfig};

use crate::SanitizeError;

/// Values given on the command line that replace the file's settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub latitude_policy: Option<LatitudePolicy>,
    pub epsilon: Option<f64>,
    pub home: Option<Hemisphere>,
    pub threshold: Option<f64>,
    pub meridian_offset: Option<f64>,
    pub strategy: Option<DatelineStrategy>,
}

impl ConfigOverrides {
    /// Applies every set override to `config`.
    #[must_use]
    pub fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(policy) = self.latitude_policy {
            config.latitude_policy = policy;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(home) = self.home {
            config.dateline.home = home;
        }
        if let Some(threshold) = self.threshold {
            config.dateline.threshold = threshold;
        }
        if let Some(offset) = self.meridian_offset {
            config.dateline.meridian_offset = offset;
        }
        if let Some(strategy) = self.strategy {
            config.dateline.strategy = strategy;
        }
        config
    }
}

/// Parses a configuration document.
///
/// # Errors
///
/// Returns [`SanitizeError::Config`] if the TOML is malformed or holds
/// unknown enum values.
pub fn parse_config(toml_str: &str) -> Result<PipelineConfig, SanitizeError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Reads the configuration file at `path`, or the defaults when `None`.
///
/// # Errors
///
/// Returns [`SanitizeError::Io`] if the file cannot be read, or
/// [`SanitizeError::Config`] if it does not parse.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, SanitizeError> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|e| SanitizeError::io(path, e))?;
    let config = parse_config(&contents)?;
    log::info!(
        "Loaded config from {}: latitude policy {}, dateline home {} ({})",
        path.display(),
        config.latitude_policy,
        config.dateline.home,
        config.dateline.strategy
    );
    Ok(config)
}
