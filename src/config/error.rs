//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid budget mode: {0}")]
    InvalidBudgetMode(String),

    #[error("Manual budget mode requires a non-negative manual_amount")]
    MissingManualAmount,

    #[error("Automatic budget mode requires a period (daily, weekly or monthly)")]
    MissingBudgetPeriod,

    #[error("Invalid budget period: {0}")]
    InvalidBudgetPeriod(String),

    #[error("Zero-vote percent must be between 0 and 100")]
    InvalidZeroVotePercent,

    #[error("max_dispatches must be a positive integer")]
    InvalidMaxDispatches,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Dispatch channel name cannot be empty")]
    EmptyDispatchChannel,
}

impl From<ValidationError> for DomainError {
    fn from(e: ValidationError) -> Self {
        DomainError::new(ErrorCode::ConfigurationError, e.to_string())
    }
}
