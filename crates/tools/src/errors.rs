use thiserror::Error;

/// Errors raised while invoking a node.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tools service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Transport error calling {class_path}: {source}")]
    Transport {
        class_path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Tools service returned HTTP {status} for {class_path}: {body}")]
    Status { class_path: String, status: u16, body: String },

    #[error("Malformed response from {class_path}: {reason}")]
    MalformedResponse { class_path: String, reason: String },
}

impl ToolError {
    /// Create a malformed response error.
    pub fn malformed(class_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            class_path: class_path.into(),
            reason: reason.into(),
        }
    }
}
