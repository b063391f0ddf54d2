//! Configuration validation.

use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

/// Validate the demo configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), ValidationError> {
    if config.port == 0 {
        return Err(ValidationError::InvalidPort {
            port: config.port,
            reason: "Port must be between 1 and 65535".to_string(),
        });
    }
    debug!(port = config.port, "validated application configuration");
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: {reason}")]
    InvalidPort { port: u16, reason: String },
}
