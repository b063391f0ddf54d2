//! Managed external processes.
//!
//! The controller never touches OS process APIs directly. It asks a
//! [`ProcessLauncher`] for a [`ManagedProcess`] and drives it through the
//! narrow `pid` / `is_alive` / `terminate` interface; signal handling stays
//! behind that interface.

mod child;
mod command;

use std::time::Duration;

use async_trait::async_trait;

use crate::types::ProcessError;

pub use child::ChildProcess;
pub use command::{CommandLauncher, UI_SERVER_ARGS};

/// How a managed process ended when asked to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The process had already exited before termination was requested.
    AlreadyExited,
    /// The process exited within the grace period after the polite signal.
    Graceful,
    /// The process ignored the polite signal and was killed.
    Forced,
}

/// Spawns the UI server for a given port.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn launch(&self, port: u16) -> Result<Box<dyn ManagedProcess>, ProcessError>;
}

/// A child process supervised by a controller.
#[async_trait]
pub trait ManagedProcess: Send + Sync {
    /// OS process id, if the platform reported one.
    fn pid(&self) -> Option<u32>;

    /// Poll liveness without blocking. Reaps the process if it has exited.
    fn is_alive(&mut self) -> Result<bool, ProcessError>;

    /// Ask the process to exit, wait up to `grace`, then kill it.
    async fn terminate(&mut self, grace: Duration) -> Result<Termination, ProcessError>;
}
