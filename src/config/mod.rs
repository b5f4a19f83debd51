//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SPBLOG` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use spblog::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listing {} posts per page", config.blog.page_size);
//! ```

mod blog;
mod database;
mod error;
mod logging;

pub use blog::{BlogConfig, MAX_SUBSCRIPTION_TTL_SECS};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{Environment, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Logging configuration (filter, output format)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Blog behaviour (paging, excerpts, sidebar, subscriptions)
    #[serde(default)]
    pub blog: BlogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SPBLOG` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SPBLOG__DATABASE__URL=...` -> `database.url = ...`
    /// - `SPBLOG__BLOG__PAGE_SIZE=20` -> `blog.page_size = 20`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SPBLOG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.logging.validate()?;
        self.blog.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.logging.is_production()
    }
}
