//! Status types for applications.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApplicationStatus {
    /// UI server process is running.
    Running,
    /// No UI server process.
    Stopped,
    /// Launch failed or the process could not be stopped cleanly.
    Error,
    /// UI server process is being launched.
    Starting,
    /// UI server process is being terminated.
    Stopping,
}

impl ApplicationStatus {
    /// Get the display text for this status.
    pub fn display(&self) -> &'static str {
        match self {
            ApplicationStatus::Running => "Running",
            ApplicationStatus::Stopped => "Stopped",
            ApplicationStatus::Error => "Error",
            ApplicationStatus::Starting => "Starting",
            ApplicationStatus::Stopping => "Stopping",
        }
    }

    /// Check if the application is in a running state.
    pub fn is_running(&self) -> bool {
        matches!(self, ApplicationStatus::Running)
    }

    /// Check if the application is in a transitional state.
    pub fn is_transitional(&self) -> bool {
        matches!(self, ApplicationStatus::Starting | ApplicationStatus::Stopping)
    }
}

/// Identity of one controller instance within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Snapshot of a controller instance as seen by collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDetail {
    pub id: InstanceId,

    /// Application display name.
    pub name: String,

    pub description: String,

    /// Port the UI server binds.
    pub port: u16,

    pub status: ApplicationStatus,

    /// PID of the UI server process while it runs.
    pub pid: Option<u32>,

    /// Last successful start.
    pub last_start: Option<DateTime<Utc>>,

    /// Last lifecycle error message.
    pub last_error: Option<String>,
}

impl ApplicationDetail {
    /// Create a stopped detail.
    pub fn new(id: InstanceId, name: impl Into<String>, description: impl Into<String>, port: u16) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            port,
            status: ApplicationStatus::Stopped,
            pid: None,
            last_start: None,
            last_error: None,
        }
    }

    /// URL a browser on this machine would use.
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}
