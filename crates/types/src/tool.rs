//! Tool invocation payloads.
//!
//! Node services are not consistent about how they report success: some
//! return a JSON boolean, others the string `"true"`. [`ToolResponse`]
//! folds both into a single `bool` so callers never look at the raw field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inputs passed to a node. Every value is string-typed on the wire.
pub type ToolInputs = IndexMap<String, String>;

/// Normalized response of a node invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the node reported success.
    pub success: bool,

    /// All fields returned by the node, including `success` and `error`.
    pub payload: Map<String, Value>,

    /// Error message reported by the node, if any.
    pub error: Option<String>,
}

impl ToolResponse {
    /// Build a response from a decoded JSON object.
    pub fn from_object(payload: Map<String, Value>) -> Self {
        let success = payload.get("success").is_some_and(is_truthy);
        let error = match payload.get("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self { success, payload, error }
    }

    /// Look up a payload field as display text.
    pub fn text(&self, key: &str) -> Option<String> {
        self.payload.get(key).and_then(value_as_text)
    }
}

/// `true` and `"true"` (any case) are truthy; everything else is not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        other => Some(other.to_string()),
    }
}

/// Result of the time node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeReading {
    /// Formatted time string.
    pub time: String,
    pub timezone: Option<String>,
    /// Unix timestamp as reported by the node.
    pub timestamp: Option<String>,
    /// ISO-8601 rendering of the same instant.
    pub iso: Option<String>,
}

impl TimeReading {
    /// Extract the time fields from a successful response.
    ///
    /// Older node versions put the formatted time under `result` instead of
    /// `current_time`.
    pub fn from_response(response: &ToolResponse) -> Self {
        let time = response
            .text("current_time")
            .or_else(|| response.text("result"))
            .unwrap_or_default();
        let iso = ["iso_format", "iso", "iso_time"].iter().find_map(|key| response.text(key));
        Self {
            time,
            timezone: response.text("timezone"),
            timestamp: response.text("timestamp"),
            iso,
        }
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    /// `file`, `directory` or whatever the node reports.
    #[serde(rename = "type")]
    pub kind: String,
    /// Size in bytes; absent for directories on most nodes.
    pub size: Option<u64>,
}

impl FileEntry {
    /// Leniently read an entry from a JSON value. Non-objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let path = object.get("path").and_then(Value::as_str).unwrap_or_default().to_string();
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| path.rsplit(['/', '\\']).next().unwrap_or_default().to_string());
        let kind = match (object.get("type").and_then(Value::as_str), object.get("is_dir").and_then(Value::as_bool)) {
            (Some(kind), _) => kind.to_string(),
            (None, Some(true)) => "directory".to_string(),
            (None, _) => "file".to_string(),
        };
        let size = match object.get("size") {
            Some(Value::Number(number)) => number.as_u64(),
            Some(Value::String(text)) => text.trim().parse().ok(),
            _ => None,
        };
        Some(Self { name, path, kind, size })
    }

    /// Size column text.
    pub fn size_display(&self) -> String {
        self.size.map(|bytes| format!("{bytes} B")).unwrap_or_else(|| "-".to_string())
    }
}

/// Result of the list-files node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileListing {
    pub entries: Vec<FileEntry>,
    /// Set when the `files` field could not be decoded; `entries` is then empty.
    pub parse_error: Option<String>,
}

impl FileListing {
    /// Extract the listing from a successful response.
    ///
    /// The `files` field is either a JSON array or a JSON string holding an
    /// encoded array. A string that does not decode to an array produces an
    /// empty listing with `parse_error` set.
    pub fn from_response(response: &ToolResponse) -> Self {
        match response.payload.get("files") {
            None | Some(Value::Null) => Self::default(),
            Some(Value::Array(items)) => Self::from_items(items),
            Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
                Ok(Value::Array(items)) => Self::from_items(&items),
                Ok(other) => Self::failed(format!("expected a JSON array, got {}", json_kind(&other))),
                Err(error) => Self::failed(error.to_string()),
            },
            Some(other) => Self::failed(format!("expected a JSON array, got {}", json_kind(other))),
        }
    }

    fn from_items(items: &[Value]) -> Self {
        Self {
            entries: items.iter().filter_map(FileEntry::from_value).collect(),
            parse_error: None,
        }
    }

    fn failed(reason: String) -> Self {
        Self {
            entries: Vec::new(),
            parse_error: Some(reason),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> ToolResponse {
        match value {
            Value::Object(map) => ToolResponse::from_object(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn success_accepts_bool_and_string_forms() {
        assert!(response(json!({"success": true})).success);
        assert!(response(json!({"success": "true"})).success);
        assert!(response(json!({"success": "TRUE"})).success);
        assert!(!response(json!({"success": false})).success);
        assert!(!response(json!({"success": "false"})).success);
        assert!(!response(json!({"success": 1})).success);
        assert!(!response(json!({"current_time": "now"})).success);
    }

    #[test]
    fn error_field_is_captured() {
        let resp = response(json!({"success": false, "error": "unknown timezone"}));
        assert_eq!(resp.error.as_deref(), Some("unknown timezone"));

        let resp = response(json!({"success": false, "error": null}));
        assert_eq!(resp.error, None);
    }

    #[test]
    fn time_reading_prefers_current_time_then_result() {
        let reading = TimeReading::from_response(&response(json!({
            "success": true,
            "current_time": "2024-01-01",
            "timezone": "UTC",
            "timestamp": 1704067200,
            "iso_format": "2024-01-01T00:00:00+00:00"
        })));
        assert_eq!(reading.time, "2024-01-01");
        assert_eq!(reading.timezone.as_deref(), Some("UTC"));
        assert_eq!(reading.timestamp.as_deref(), Some("1704067200"));
        assert_eq!(reading.iso.as_deref(), Some("2024-01-01T00:00:00+00:00"));

        let legacy = TimeReading::from_response(&response(json!({"success": "true", "result": "12:00"})));
        assert_eq!(legacy.time, "12:00");
        assert_eq!(legacy.timezone, None);
    }

    #[test]
    fn file_listing_decodes_array_and_encoded_string() {
        let direct = FileListing::from_response(&response(json!({
            "success": true,
            "files": [{"name": "a.txt", "path": "/tmp/a.txt", "type": "file", "size": 12}]
        })));
        assert_eq!(direct.entries.len(), 1);
        assert_eq!(direct.entries[0].size, Some(12));
        assert!(direct.parse_error.is_none());

        let encoded = FileListing::from_response(&response(json!({
            "success": true,
            "files": "[{\"path\": \"/tmp/sub\", \"is_dir\": true}]"
        })));
        assert_eq!(encoded.entries.len(), 1);
        assert_eq!(encoded.entries[0].name, "sub");
        assert_eq!(encoded.entries[0].kind, "directory");
        assert_eq!(encoded.entries[0].size_display(), "-");
    }

    #[test]
    fn file_listing_falls_back_to_empty_on_invalid_json() {
        let listing = FileListing::from_response(&response(json!({"success": true, "files": "[{not json"})));
        assert!(listing.entries.is_empty());
        assert!(listing.parse_error.is_some());

        let listing = FileListing::from_response(&response(json!({"success": true, "files": "{\"a\": 1}"})));
        assert!(listing.entries.is_empty());
        assert_eq!(listing.parse_error.as_deref(), Some("expected a JSON array, got an object"));
    }

    #[test]
    fn missing_files_field_is_an_empty_listing() {
        let listing = FileListing::from_response(&response(json!({"success": true})));
        assert_eq!(listing, FileListing::default());
    }
}
