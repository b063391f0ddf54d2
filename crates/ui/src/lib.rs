//! Web frontend of the AutoTask demo application.
//!
//! Two server-rendered form pages, one per node: the time page collects a
//! format string and a timezone, the file page a directory, a glob pattern
//! and two flags. Each submission performs exactly one node call through
//! a [`NodeRunner`](autotask_tools::NodeRunner) and renders either the
//! result or an error panel. The form is always rendered again with the
//! submitted values so a failed request can be retried.

mod pages;
mod render;
mod server;

pub use pages::{FileForm, FilesOutcome, TimeForm, TimeOutcome, UiState, router, run_file_query, run_time_query};
pub use server::{RunningUiServer, UiServer, resolve_bind_address};
