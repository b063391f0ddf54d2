//! HTTP tool client.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use autotask_types::{ToolInputs, ToolResponse};
use reqwest::{Client, header};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::ToolError;

/// Environment variable holding the tools service base URL.
pub const TOOLS_URL_ENV: &str = "AUTOTASK_TOOLS_URL";

/// Base URL used when [`TOOLS_URL_ENV`] is unset.
pub const DEFAULT_TOOLS_URL: &str = "http://127.0.0.1:8765";

/// Maximum time a single node invocation may take.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes nodes by class path.
#[async_trait]
pub trait NodeRunner: Send + Sync {
    /// Run the node at `class_path` with `inputs` and return its normalized response.
    async fn run_node(&self, class_path: &str, inputs: &ToolInputs) -> Result<ToolResponse, ToolError>;
}

#[derive(Serialize)]
struct RunNodeRequest<'a> {
    class_path: &'a str,
    inputs: &'a ToolInputs,
}

/// Thin wrapper around a configured `reqwest::Client` for the node service.
#[derive(Debug, Clone)]
pub struct ToolsClient {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl ToolsClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ToolError> {
        let base_url = validate_base_url(base_url)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| ToolError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: error.to_string(),
            })?;
        Ok(Self {
            base_url,
            http,
            user_agent: format!("autotask-demo/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Create a client from `AUTOTASK_TOOLS_URL`, falling back to the local default.
    pub fn from_env() -> Result<Self, ToolError> {
        let base_url = env::var(TOOLS_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOOLS_URL.to_string());
        Self::new(&base_url)
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self) -> Result<Url, ToolError> {
        self.base_url.join("nodes/run").map_err(|error| ToolError::InvalidBaseUrl {
            url: self.base_url.to_string(),
            reason: error.to_string(),
        })
    }
}

#[async_trait]
impl NodeRunner for ToolsClient {
    async fn run_node(&self, class_path: &str, inputs: &ToolInputs) -> Result<ToolResponse, ToolError> {
        let url = self.endpoint()?;
        debug!(%url, class_path, ?inputs, "running node");

        let transport = |source| ToolError::Transport {
            class_path: class_path.to_string(),
            source,
        };
        let response = self
            .http
            .post(url)
            .header(header::USER_AGENT, &self.user_agent)
            .json(&RunNodeRequest { class_path, inputs })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(ToolError::Status {
                class_path: class_path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|error| ToolError::malformed(class_path, error.to_string()))?;
        decode_response(class_path, value)
    }
}

/// Accept either a JSON object or a JSON string that itself encodes an object.
pub(crate) fn decode_response(class_path: &str, value: Value) -> Result<ToolResponse, ToolError> {
    match value {
        Value::Object(map) => Ok(ToolResponse::from_object(map)),
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Object(map)) => Ok(ToolResponse::from_object(map)),
            Ok(_) => Err(ToolError::malformed(class_path, "encoded response is not a JSON object")),
            Err(error) => Err(ToolError::malformed(class_path, error.to_string())),
        },
        _ => Err(ToolError::malformed(class_path, "response is neither an object nor a JSON string")),
    }
}

/// Parse the base URL, requiring http(s) and a host. A trailing slash is
/// added so relative joins keep any path prefix.
fn validate_base_url(base: &str) -> Result<Url, ToolError> {
    let invalid = |reason: String| ToolError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let mut url = Url::parse(base.trim()).map_err(|error| invalid(error.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
