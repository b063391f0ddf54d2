//! Shared types for the AutoTask demo application.
//!
//! These are the plain data structures exchanged between the controller,
//! the UI frontend and the tool client:
//!
//! - [`ConfigField`] describes one entry of an application's config schema
//! - [`AppManifest`] carries the package metadata the host displays
//! - [`ToolResponse`] is the normalized result of a node invocation, with
//!   typed views in [`TimeReading`] and [`FileListing`]

mod config_field;
mod manifest;
mod tool;

pub use config_field::{ConfigField, ConfigSchema, FieldType};
pub use manifest::{AppManifest, DEMO_MANIFEST};
pub use tool::{FileEntry, FileListing, TimeReading, ToolInputs, ToolResponse};
