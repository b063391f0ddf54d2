//! Client for the AutoTask node execution service.
//!
//! Nodes are addressed by a fully-qualified class path and take a map of
//! string inputs. The [`NodeRunner`] trait is the seam used by the UI so
//! handlers can be exercised without a running service; [`ToolsClient`] is
//! the HTTP implementation.

mod client;
mod errors;
mod nodes;

pub use client::{DEFAULT_TOOLS_URL, NodeRunner, TOOLS_URL_ENV, ToolsClient};
pub use errors::ToolError;
pub use nodes::{FileQuery, LIST_FILES_NODE, TIME_NODE, TimeQuery, get_current_time, list_files};
