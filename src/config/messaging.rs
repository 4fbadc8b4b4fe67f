//! Messaging configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Messaging configuration (Redis pub/sub for analysis requests)
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Redis connection URL
    pub redis_url: String,

    /// Channel carrying "analyze this id" messages
    #[serde(default = "default_dispatch_channel")]
    pub dispatch_channel: String,
}

impl MessagingConfig {
    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.redis_url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !self.redis_url.starts_with("redis://") && !self.redis_url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.dispatch_channel.trim().is_empty() {
            return Err(ValidationError::EmptyDispatchChannel);
        }
        Ok(())
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            redis_url: String::new(),
            dispatch_channel: default_dispatch_channel(),
        }
    }
}

fn default_dispatch_channel() -> String {
    "analysis-requests".to_string()
}
