//! Routes, form handling and node dispatch for the two pages.

use std::sync::Arc;

use autotask_tools::{FileQuery, NodeRunner, TimeQuery, get_current_time, list_files};
use autotask_types::{FileListing, TimeReading};
use axum::Router;
use axum::extract::{Form, State};
use axum::response::Html;
use axum::routing::get;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::render;

/// Shared state of the UI handlers.
#[derive(Clone)]
pub struct UiState {
    runner: Arc<dyn NodeRunner>,
}

impl UiState {
    pub fn new(runner: Arc<dyn NodeRunner>) -> Self {
        Self { runner }
    }
}

/// Build the UI router.
pub fn router(state: UiState) -> Router {
    Router::new()
        .route("/", get(time_page))
        .route("/time", get(time_page).post(submit_time))
        .route("/files", get(files_page).post(submit_files))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Fields posted by the time form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeForm {
    #[serde(default)]
    pub format_string: String,
    #[serde(default)]
    pub timezone: String,
}

impl From<TimeForm> for TimeQuery {
    fn from(form: TimeForm) -> Self {
        Self {
            format_string: form.format_string,
            timezone: form.timezone,
        }
    }
}

/// Fields posted by the file form. Unchecked checkboxes are simply absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileForm {
    #[serde(default)]
    pub directory: String,
    #[serde(default)]
    pub pattern: String,
    pub include_dirs: Option<String>,
    pub recursive: Option<String>,
}

impl From<FileForm> for FileQuery {
    fn from(form: FileForm) -> Self {
        Self {
            directory: form.directory,
            pattern: form.pattern,
            include_dirs: is_checked(form.include_dirs.as_deref()),
            recursive: is_checked(form.recursive.as_deref()),
        }
    }
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true" | "on" | "1"))
}

/// What a time form submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeOutcome {
    Success(TimeReading),
    /// The node answered but reported failure.
    Failed { error: Option<String> },
    /// The call itself failed.
    Fault(String),
}

/// What a file form submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FilesOutcome {
    Success(FileListing),
    Failed { error: Option<String> },
    Fault(String),
}

/// Run the time node once and classify the result.
pub async fn run_time_query(runner: &dyn NodeRunner, query: &TimeQuery) -> TimeOutcome {
    match get_current_time(runner, query).await {
        Ok(response) if response.success => TimeOutcome::Success(TimeReading::from_response(&response)),
        Ok(response) => {
            warn!(error = ?response.error, "time node reported failure");
            TimeOutcome::Failed { error: response.error }
        }
        Err(fault) => {
            error!("time node call failed: {fault}");
            TimeOutcome::Fault(fault.to_string())
        }
    }
}

/// Run the list-files node once and classify the result.
pub async fn run_file_query(runner: &dyn NodeRunner, query: &FileQuery) -> FilesOutcome {
    match list_files(runner, query).await {
        Ok(response) if response.success => {
            let listing = FileListing::from_response(&response);
            if let Some(reason) = &listing.parse_error {
                warn!("could not decode file list: {reason}");
            }
            FilesOutcome::Success(listing)
        }
        Ok(response) => {
            warn!(error = ?response.error, "list-files node reported failure");
            FilesOutcome::Failed { error: response.error }
        }
        Err(fault) => {
            error!("list-files node call failed: {fault}");
            FilesOutcome::Fault(fault.to_string())
        }
    }
}

pub(crate) async fn time_page() -> Html<String> {
    Html(render::time_page(&TimeQuery::default(), None))
}

pub(crate) async fn submit_time(State(state): State<UiState>, Form(form): Form<TimeForm>) -> Html<String> {
    let query = TimeQuery::from(form);
    debug!(?query, "time form submitted");
    let outcome = run_time_query(state.runner.as_ref(), &query).await;
    Html(render::time_page(&query, Some(&outcome)))
}

pub(crate) async fn files_page() -> Html<String> {
    Html(render::files_page(&FileQuery::default(), None))
}

pub(crate) async fn submit_files(State(state): State<UiState>, Form(form): Form<FileForm>) -> Html<String> {
    let query = FileQuery::from(form);
    debug!(?query, "file form submitted");
    let outcome = run_file_query(state.runner.as_ref(), &query).await;
    Html(render::files_page(&query, Some(&outcome)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use autotask_tools::{LIST_FILES_NODE, TIME_NODE, ToolError};
    use autotask_types::{ToolInputs, ToolResponse};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Records every call and answers with a canned reply.
    pub(crate) struct FakeRunner {
        reply: Box<dyn Fn() -> Result<ToolResponse, ToolError> + Send + Sync>,
        pub(crate) calls: Mutex<Vec<(String, ToolInputs)>>,
    }

    impl FakeRunner {
        pub(crate) fn answering(value: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(move || match value.clone() {
                    Value::Object(map) => Ok(ToolResponse::from_object(map)),
                    other => panic!("fake replies must be objects, got {other}"),
                }),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(move || Err(ToolError::malformed("fake", reason))),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl NodeRunner for FakeRunner {
        async fn run_node(&self, class_path: &str, inputs: &ToolInputs) -> Result<ToolResponse, ToolError> {
            self.calls.lock().unwrap().push((class_path.to_string(), inputs.clone()));
            (self.reply)()
        }
    }

    fn state(runner: &Arc<FakeRunner>) -> UiState {
        UiState::new(runner.clone())
    }

    #[tokio::test]
    async fn time_submission_forwards_inputs_and_shows_time() {
        let runner = FakeRunner::answering(json!({"success": true, "current_time": "2024-01-01"}));
        let form = TimeForm {
            format_string: "%Y-%m-%d".to_string(),
            timezone: "UTC".to_string(),
        };

        let Html(body) = submit_time(State(state(&runner)), Form(form)).await;

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, TIME_NODE);
        assert_eq!(calls[0].1["format_string"], "%Y-%m-%d");
        assert_eq!(calls[0].1["timezone"], "UTC");
        assert!(body.contains("Current Time:"));
        assert!(body.contains("<h2 class=\"time\">2024-01-01</h2>"));
    }

    #[tokio::test]
    async fn string_success_flag_is_accepted() {
        let runner = FakeRunner::answering(json!({"success": "true", "result": "10:15:00"}));
        let outcome = run_time_query(runner.as_ref(), &TimeQuery::default()).await;
        assert!(matches!(outcome, TimeOutcome::Success(reading) if reading.time == "10:15:00"));
    }

    #[tokio::test]
    async fn falsy_success_renders_error_panel() {
        let runner = FakeRunner::answering(json!({"success": false, "current_time": "2024-01-01", "error": "unknown timezone 'Mars/Olympus'"}));
        let form = TimeForm {
            format_string: "%H:%M".to_string(),
            timezone: "Mars/Olympus".to_string(),
        };

        let Html(body) = submit_time(State(state(&runner)), Form(form)).await;

        assert!(body.contains("Failed to get current time"));
        assert!(body.contains("Error: unknown timezone 'Mars/Olympus'"));
        assert!(!body.contains("Current Time:"));
        // Form is still there, holding the submitted values.
        assert!(body.contains("value=\"Mars/Olympus\""));
    }

    #[tokio::test]
    async fn call_fault_renders_operation_failed() {
        let runner = FakeRunner::failing("connection reset");
        let Html(body) = submit_time(State(state(&runner)), Form(TimeForm::default())).await;
        assert!(body.contains("Operation failed:"));
        assert!(body.contains("connection reset"));
        assert!(body.contains("<form"));
    }

    #[tokio::test]
    async fn file_submission_forwards_string_booleans() {
        let runner = FakeRunner::answering(json!({
            "success": true,
            "files": [
                {"name": "notes.txt", "path": "/tmp/notes.txt", "type": "file", "size": 42},
                {"name": "cache", "path": "/tmp/cache", "type": "directory"}
            ]
        }));
        let form = FileForm {
            directory: "/tmp".to_string(),
            pattern: "*.txt".to_string(),
            include_dirs: Some("true".to_string()),
            recursive: None,
        };

        let Html(body) = submit_files(State(state(&runner)), Form(form)).await;

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].0, LIST_FILES_NODE);
        let forwarded: Vec<(&str, &str)> = calls[0].1.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            forwarded,
            vec![("directory", "/tmp"), ("pattern", "*.txt"), ("include_dirs", "true"), ("recursive", "false")]
        );
        assert!(body.contains("<td>notes.txt</td>"));
        assert!(body.contains("<td>42 B</td>"));
        assert!(body.contains("<td>directory</td>"));
        assert!(body.contains("2 entries"));
    }

    #[tokio::test]
    async fn invalid_nested_file_json_renders_empty_table_and_notice() {
        let runner = FakeRunner::answering(json!({"success": true, "files": "[{\"name\": "}));
        let Html(body) = submit_files(State(state(&runner)), Form(FileForm::default())).await;

        assert!(body.contains("Failed to parse file list:"));
        assert!(body.contains("<tbody></tbody>"));
        assert!(body.contains("0 entries"));
    }

    #[tokio::test]
    async fn file_failure_and_fault_are_contained() {
        let runner = FakeRunner::answering(json!({"success": "false", "error": "permission denied"}));
        let outcome = run_file_query(runner.as_ref(), &FileQuery::default()).await;
        assert_eq!(
            outcome,
            FilesOutcome::Failed {
                error: Some("permission denied".to_string())
            }
        );

        let runner = FakeRunner::failing("timeout");
        let Html(body) = submit_files(State(state(&runner)), Form(FileForm::default())).await;
        assert!(body.contains("Operation failed:"));
    }

    #[test]
    fn checkbox_values() {
        assert!(is_checked(Some("true")));
        assert!(is_checked(Some("on")));
        assert!(!is_checked(Some("false")));
        assert!(!is_checked(None));
    }
}
