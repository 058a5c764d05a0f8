//! Bandmap configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{engine::weights::Weights, types::Band};

/// Errors raised while loading a [`BandmapConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Json(serde_json::Error),
    /// The configuration parsed but is not usable.
    Invalid(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Tuning of the bandmap engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandmapConfig {
    /// Bands shown in the band summary, in display order.
    pub bands: Vec<Band>,
    /// Spots older than this many seconds are aged out.
    pub max_age_secs: u64,
    /// Weighted value factors.
    pub weights: Weights,
}

impl Default for BandmapConfig {
    fn default() -> Self {
        Self {
            bands: Band::CONTEST_BANDS.to_vec(),
            max_age_secs: 600,
            weights: Weights::default(),
        }
    }
}

impl BandmapConfig {
    /// Parses and validates a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a bandmap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bands.is_empty() {
            return Err(ConfigError::Invalid("no bands configured".to_string()));
        }
        if self.max_age_secs == 0 {
            return Err(ConfigError::Invalid("max_age_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Maximum spot age.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}
