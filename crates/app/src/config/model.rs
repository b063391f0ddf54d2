//! Data model for the demo application's configuration.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::validate_config;

/// Port the UI server binds when none is configured.
pub const DEFAULT_PORT: u16 = 8501;

/// Demo application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// TCP port of the embedded UI server.
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl AppConfig {
    /// Build a validated config from the option map handed over by the host.
    ///
    /// Unknown keys are ignored and a missing `port` takes the default.
    pub fn from_map(options: &Map<String, Value>) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_value(Value::Object(options.clone()))?;
        validate_config(&config)?;
        Ok(config)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Hosts send numeric form fields as JSON numbers, sometimes as floats
/// (`8501.0`) and sometimes as strings.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let port = match &value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|float| float.fract() == 0.0 && *float >= 0.0).map(|float| float as u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    port.and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| de::Error::custom(format!("invalid port value: {value}")))
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::config::ValidationError),
}
