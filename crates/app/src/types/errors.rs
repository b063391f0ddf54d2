//! Error types for application lifecycle management.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the host by an application's lifecycle methods.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Failed to launch UI server: {source}")]
    Launch {
        #[source]
        source: ProcessError,
    },

    #[error("UI server already running with PID {pid:?}")]
    AlreadyRunning { pid: Option<u32> },

    #[error("Failed to stop UI server: {source}")]
    Shutdown {
        #[source]
        source: ProcessError,
    },

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Errors from spawning, signalling or reaping a managed process.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Could not resolve the current executable: {0}")]
    CurrentExe(#[source] std::io::Error),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to signal PID {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),
}

impl ApplicationError {
    /// Create a launch error.
    pub fn launch(source: ProcessError) -> Self {
        Self::Launch { source }
    }

    /// Create a shutdown error.
    pub fn shutdown(source: ProcessError) -> Self {
        Self::Shutdown { source }
    }
}
