//! # Player Configuration

use crate::error::{PlaybackError, Result};
use crate::speed::SpeedPreset;
use bridge_traits::EngineCapabilities;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether decode and playback may share the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeExclusivity {
    /// Follow `EngineCapabilities::concurrent_decode`.
    #[default]
    Auto,
    /// Never run decode and playback together.
    Always,
    /// Let the engine sort it out.
    Never,
}

impl DecodeExclusivity {
    pub fn enforced(self, capabilities: &EngineCapabilities) -> bool {
        match self {
            DecodeExclusivity::Auto => !capabilities.concurrent_decode,
            DecodeExclusivity::Always => true,
            DecodeExclusivity::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Progress poll period in milliseconds.
    ///
    /// Default: 500.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Capacity of the progress channel. Ticks are dropped, not queued, when
    /// the observer falls this far behind.
    ///
    /// Default: 16.
    #[serde(default = "default_progress_buffer")]
    pub progress_buffer: usize,

    #[serde(default)]
    pub exclusivity: DecodeExclusivity,

    /// Speed applied when the controller is created.
    #[serde(default)]
    pub initial_speed: SpeedPreset,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            progress_buffer: default_progress_buffer(),
            exclusivity: DecodeExclusivity::default(),
            initial_speed: SpeedPreset::default(),
        }
    }
}

impl PlayerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn with_exclusivity(mut self, exclusivity: DecodeExclusivity) -> Self {
        self.exclusivity = exclusivity;
        self
    }

    pub fn with_initial_speed(mut self, preset: SpeedPreset) -> Self {
        self.initial_speed = preset;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "poll_interval_ms must be > 0".to_string(),
            ));
        }

        if self.progress_buffer == 0 {
            return Err(PlaybackError::Config(
                "progress_buffer must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)
            .map_err(|e| PlaybackError::Config(format!("Invalid player config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_progress_buffer() -> usize {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.progress_buffer, 16);
        assert_eq!(config.exclusivity, DecodeExclusivity::Auto);
        assert_eq!(config.initial_speed, SpeedPreset::Normal);
    }

    #[test]
    fn test_config_validation() {
        let mut config = PlayerConfig::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.progress_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            PlayerConfig::from_json_str(r#"{"poll_interval_ms": 250, "exclusivity": "always"}"#)
                .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.exclusivity, DecodeExclusivity::Always);
        assert_eq!(config.progress_buffer, 16);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            PlayerConfig::from_json_str(r#"{"poll_interval_ms": 0}"#),
            Err(PlaybackError::Config(_))
        ));
        assert!(PlayerConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_exclusivity_resolution() {
        let exclusive = EngineCapabilities::default();
        let shared = EngineCapabilities {
            concurrent_decode: true,
            ..Default::default()
        };

        assert!(DecodeExclusivity::Auto.enforced(&exclusive));
        assert!(!DecodeExclusivity::Auto.enforced(&shared));
        assert!(DecodeExclusivity::Always.enforced(&shared));
        assert!(!DecodeExclusivity::Never.enforced(&exclusive));
    }
}
