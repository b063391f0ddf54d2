//! Config schema descriptors shown by the host's settings form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered map of option name to field descriptor.
pub type ConfigSchema = IndexMap<String, ConfigField>;

/// Input widget type for a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Text,
    Boolean,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Number => write!(f, "number"),
            FieldType::Text => write!(f, "text"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A single configurable option of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    /// Widget type.
    pub field_type: FieldType,

    /// Human readable label.
    pub label: String,

    /// Longer help text.
    pub description: String,

    /// Value used when the option is absent.
    pub default: Value,

    /// Whether the host must collect a value.
    pub required: bool,

    /// Settings section the field is grouped under.
    pub section: String,
}

impl ConfigField {
    /// Create a numeric field.
    pub fn number(label: impl Into<String>, description: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            field_type: FieldType::Number,
            label: label.into(),
            description: description.into(),
            default: default.into(),
            required: false,
            section: "general".to_string(),
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Place the field in a settings section.
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }
}
