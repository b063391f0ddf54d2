//! tokio-backed managed child process.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{ManagedProcess, Termination};
use crate::types::ProcessError;

/// A spawned child process. Killed if dropped while still running.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    pid: Option<u32>,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        let pid = child.id();
        Self { child, pid }
    }

    /// Send the polite termination request. Returns `false` if the process
    /// was already gone.
    #[cfg(unix)]
    fn request_exit(&mut self) -> Result<bool, ProcessError> {
        let Some(pid) = self.pid else {
            return Ok(false);
        };
        // SAFETY: `pid` belongs to our own unreaped child, so it cannot have
        // been recycled for another process.
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc == 0 {
            return Ok(true);
        }
        let error = std::io::Error::last_os_error();
        if error.raw_os_error() == Some(libc::ESRCH) {
            Ok(false)
        } else {
            Err(ProcessError::Signal { pid, source: error })
        }
    }

    /// No polite signal outside Unix; the grace wait is skipped.
    #[cfg(not(unix))]
    fn request_exit(&mut self) -> Result<bool, ProcessError> {
        Ok(true)
    }
}

#[async_trait]
impl ManagedProcess for ChildProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn is_alive(&mut self) -> Result<bool, ProcessError> {
        Ok(self.child.try_wait().map_err(ProcessError::Wait)?.is_none())
    }

    async fn terminate(&mut self, grace: Duration) -> Result<Termination, ProcessError> {
        if !self.is_alive()? {
            debug!(pid = ?self.pid, "process already exited");
            return Ok(Termination::AlreadyExited);
        }

        if cfg!(unix) {
            if !self.request_exit()? {
                self.child.wait().await.map_err(ProcessError::Wait)?;
                return Ok(Termination::AlreadyExited);
            }
            match timeout(grace, self.child.wait()).await {
                Ok(Ok(status)) => {
                    debug!(pid = ?self.pid, %status, "process exited after termination request");
                    return Ok(Termination::Graceful);
                }
                Ok(Err(error)) => return Err(ProcessError::Wait(error)),
                Err(_) => warn!(pid = ?self.pid, ?grace, "process still alive after grace period, killing"),
            }
        } else {
            self.request_exit()?;
        }

        self.child.kill().await.map_err(ProcessError::Wait)?;
        Ok(Termination::Forced)
    }
}
