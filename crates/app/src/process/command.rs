//! Command-line launcher for the UI server process.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ChildProcess, ManagedProcess, ProcessLauncher};
use crate::types::ProcessError;

/// Placeholder substituted with the configured port.
const PORT_PLACEHOLDER: &str = "{port}";

/// Arguments that start the UI frontend: bind on all interfaces, advertise
/// `localhost` to browsers, informational logging.
pub const UI_SERVER_ARGS: &[&str] = &[
    "ui",
    "--port",
    PORT_PLACEHOLDER,
    "--address",
    "0.0.0.0",
    "--browser-address",
    "localhost",
    "--log-level",
    "info",
];

#[derive(Debug, Clone)]
enum Program {
    /// The binary this process was started from.
    CurrentExe,
    Path(PathBuf),
}

/// Launches a fixed command line, substituting `{port}` in its arguments.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: Program,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CommandLauncher {
    /// Launch the UI server from the currently running binary.
    pub fn ui_server() -> Self {
        Self {
            program: Program::CurrentExe,
            args: UI_SERVER_ARGS.iter().map(|arg| arg.to_string()).collect(),
            envs: Vec::new(),
        }
    }

    /// Launch the UI server from an explicit binary.
    pub fn ui_server_at(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Program::Path(program.into()),
            ..Self::ui_server()
        }
    }

    /// Launch an arbitrary command.
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: Program::Path(program.into()),
            args: args.into_iter().map(Into::into).collect(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable on the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn resolve_program(&self) -> Result<PathBuf, ProcessError> {
        match &self.program {
            Program::CurrentExe => std::env::current_exe().map_err(ProcessError::CurrentExe),
            Program::Path(path) => Ok(path.clone()),
        }
    }

    /// Arguments with the port substituted.
    pub fn args_for_port(&self, port: u16) -> Vec<String> {
        let port = port.to_string();
        self.args.iter().map(|arg| arg.replace(PORT_PLACEHOLDER, &port)).collect()
    }
}

#[async_trait]
impl ProcessLauncher for CommandLauncher {
    async fn launch(&self, port: u16) -> Result<Box<dyn ManagedProcess>, ProcessError> {
        let program = self.resolve_program()?;
        let args = self.args_for_port(port);
        debug!(program = %program.display(), ?args, "spawning managed process");

        let mut command = Command::new(&program);
        command
            .args(&args)
            .envs(self.envs.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|source| ProcessError::Spawn { program, source })?;
        Ok(Box::new(ChildProcess::new(child)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_server_args_pin_address_and_port() {
        let launcher = CommandLauncher::ui_server_at("/usr/local/bin/autotask-demo");
        assert_eq!(
            launcher.args_for_port(8501),
            vec![
                "ui",
                "--port",
                "8501",
                "--address",
                "0.0.0.0",
                "--browser-address",
                "localhost",
                "--log-level",
                "info"
            ]
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let launcher = CommandLauncher::new("/definitely/not/here/autotask-ui", Vec::<String>::new());
        let error = launcher.launch(8501).await.err().expect("spawn should fail");
        assert!(matches!(error, ProcessError::Spawn { .. }));
    }
}
