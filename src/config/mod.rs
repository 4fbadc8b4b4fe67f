//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `TENDER_SENTINEL` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use tender_sentinel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod budget;
mod database;
mod error;
mod messaging;

pub use budget::BudgetConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use messaging::MessagingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for Tender Sentinel. Load using
/// [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Budget mode and dispatch limits
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Messaging configuration (Redis pub/sub)
    pub messaging: MessagingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TENDER_SENTINEL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TENDER_SENTINEL__BUDGET__MODE=auto` -> `budget.mode = auto`
    /// - `TENDER_SENTINEL__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TENDER_SENTINEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Fails fast, before any I/O: an invalid budget mode must never reach
    /// the dispatch handler.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.budget.validate()?;
        self.database.validate()?;
        self.messaging.validate()?;
        Ok(())
    }
}
