//! Configuration schema types
//!
//! This module defines the configuration structure for Hermes.

use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Hermes configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HermesConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// MHS outbound configuration
    pub mhs: MhsConfig,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HermesConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.mhs.validate(&self.environment)?;
        self.translation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// MHS outbound configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MhsConfig {
    /// Base URL of the MHS outbound endpoint
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl MhsConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("mhs.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("mhs.base_url must start with http:// or https://".to_string());
        }

        // Plain HTTP to the MHS is a development convenience only.
        if *environment == Environment::Production && !self.base_url.starts_with("https://") {
            return Err(
                "mhs.base_url must use https:// in production environments. \
                For development/testing environments, set 'environment = \"development\"' \
                or 'environment = \"staging\"'."
                    .to_string(),
            );
        }

        if self.timeout_seconds == 0 {
            return Err("mhs.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for MhsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8332".to_string(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Translation settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranslationConfig {
    /// Composition category codes excluded from immunization mapping
    #[serde(default)]
    pub excluded_composition_codes: Vec<String>,
}

impl TranslationConfig {
    fn validate(&self) -> Result<(), String> {
        if self
            .excluded_composition_codes
            .iter()
            .any(|code| code.trim().is_empty())
        {
            return Err(
                "translation.excluded_composition_codes entries cannot be empty".to_string(),
            );
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Maximum log file size in MB
    #[serde(default = "default_local_max_size_mb")]
    pub local_max_size_mb: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "size"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_max_size_mb == 0 {
            return Err("logging.local_max_size_mb must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_size_mb: default_local_max_size_mb(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "/var/log/hermes".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_size_mb() -> usize {
    100
}
