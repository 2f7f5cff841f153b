//! Configuration for bookshelf-scanner
//!
//! Camera preferences, the engine-fault policy and manual entry limits.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::FacingMode;

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
#[serde(default)]
pub struct ScannerConfig {
    /// Camera requested when asking for permission
    pub facing_mode: FacingMode,
    /// Label keywords that mark a rear camera as the default device
    pub rear_camera_keywords: Vec<String>,
    /// Consecutive engine faults before the decode loop is torn down
    /// (0 never aborts)
    pub max_consecutive_engine_errors: u32,
    /// Longest manual input accepted, in characters
    pub manual_input_max_len: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            rear_camera_keywords: vec![
                "back".to_string(),
                "rear".to_string(),
                "environment".to_string(),
            ],
            max_consecutive_engine_errors: 3,
            // "978-0-123-45678-9"
            manual_input_max_len: 17,
        }
    }
}

impl ScannerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rear_camera_keywords.is_empty() {
            return Err(ConfigError::MissingField(
                "rear_camera_keywords must not be empty".to_string(),
            ));
        }

        if self
            .rear_camera_keywords
            .iter()
            .any(|keyword| keyword.trim().is_empty())
        {
            return Err(ConfigError::OutOfRange(
                "rear_camera_keywords must not contain blank entries".to_string(),
            ));
        }

        // Must at least fit an unhyphenated ISBN-13
        if self.manual_input_max_len < 13 {
            return Err(ConfigError::OutOfRange(
                "manual_input_max_len must be at least 13".to_string(),
            ));
        }

        Ok(())
    }
}
