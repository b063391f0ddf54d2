//! Node class paths and typed queries for the two nodes the demo uses.

use autotask_types::{ToolInputs, ToolResponse};

use crate::client::NodeRunner;
use crate::errors::ToolError;

/// Class path of the "get current time" node.
pub const TIME_NODE: &str = "autotask_core.nodes.time.TimeNode";

/// Class path of the "list files" node.
pub const LIST_FILES_NODE: &str = "autotask_core.nodes.file.ListFilesNode";

/// Inputs of the time node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeQuery {
    /// strftime-style format, e.g. `%Y-%m-%d %H:%M:%S`.
    pub format_string: String,
    /// IANA timezone name, e.g. `Asia/Shanghai`.
    pub timezone: String,
}

impl Default for TimeQuery {
    fn default() -> Self {
        Self {
            format_string: "%Y-%m-%d %H:%M:%S".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl TimeQuery {
    pub fn to_inputs(&self) -> ToolInputs {
        let mut inputs = ToolInputs::new();
        inputs.insert("format_string".to_string(), self.format_string.clone());
        inputs.insert("timezone".to_string(), self.timezone.clone());
        inputs
    }
}

/// Inputs of the list-files node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    pub directory: String,
    /// Glob pattern matched against file names.
    pub pattern: String,
    pub include_dirs: bool,
    pub recursive: bool,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            pattern: "*".to_string(),
            include_dirs: false,
            recursive: false,
        }
    }
}

impl FileQuery {
    /// Booleans travel as lowercase strings.
    pub fn to_inputs(&self) -> ToolInputs {
        let mut inputs = ToolInputs::new();
        inputs.insert("directory".to_string(), self.directory.clone());
        inputs.insert("pattern".to_string(), self.pattern.clone());
        inputs.insert("include_dirs".to_string(), self.include_dirs.to_string());
        inputs.insert("recursive".to_string(), self.recursive.to_string());
        inputs
    }
}

/// Run the time node.
pub async fn get_current_time(runner: &dyn NodeRunner, query: &TimeQuery) -> Result<ToolResponse, ToolError> {
    runner.run_node(TIME_NODE, &query.to_inputs()).await
}

/// Run the list-files node.
pub async fn list_files(runner: &dyn NodeRunner, query: &FileQuery) -> Result<ToolResponse, ToolError> {
    runner.run_node(LIST_FILES_NODE, &query.to_inputs()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_query_encodes_booleans_as_lowercase_strings() {
        let query = FileQuery {
            directory: "/tmp".to_string(),
            pattern: "*.txt".to_string(),
            include_dirs: true,
            recursive: false,
        };
        let inputs = query.to_inputs();
        let pairs: Vec<(&str, &str)> = inputs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("directory", "/tmp"),
                ("pattern", "*.txt"),
                ("include_dirs", "true"),
                ("recursive", "false"),
            ]
        );
    }

    #[test]
    fn time_query_defaults() {
        let inputs = TimeQuery::default().to_inputs();
        assert_eq!(inputs["format_string"], "%Y-%m-%d %H:%M:%S");
        assert_eq!(inputs["timezone"], "UTC");
    }
}
