//! Configuration management for Hermes.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Hermes uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`HERMES_*` prefix)
//! - Default values for optional settings
//! - Comprehensive validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hermes::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hermes.toml")?;
//!
//! println!("MHS URL: {}", config.mhs.base_url);
//! println!("Log level: {}", config.application.log_level);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Environment, HermesConfig, LoggingConfig, MhsConfig, TranslationConfig,
};
