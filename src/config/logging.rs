//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::{ConfigError, ValidationError};

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Environment name
    #[serde(default)]
    pub environment: Environment,

    /// Tracing filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl LoggingConfig {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Build the filter from `RUST_LOG`, falling back to `level`.
    pub fn env_filter(&self) -> Result<EnvFilter, ValidationError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| ValidationError::InvalidLogFilter(e.to_string())),
        }
    }

    /// Install the global tracing subscriber.
    ///
    /// Production defaults to JSON output regardless of `json`.
    pub fn init_tracing(&self) -> Result<(), ConfigError> {
        let filter = self.env_filter()?;
        let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

        let result = if self.json || self.is_production() {
            builder.json().try_init()
        } else {
            builder.compact().try_init()
        };
        result.map_err(|e| ConfigError::Logging(e.to_string()))
    }

    /// Validate logging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidLogFilter(e.to_string()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info,spblog=debug,sqlx=warn".to_string()
}
