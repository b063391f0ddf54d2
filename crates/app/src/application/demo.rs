//! Controller for the demo application.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use autotask_types::{ConfigField, ConfigSchema};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::{Application, ApplicationRegistry};
use crate::config::{AppConfig, DEFAULT_PORT};
use crate::process::{CommandLauncher, ManagedProcess, ProcessLauncher, Termination};
use crate::types::{ApplicationDetail, ApplicationError, ApplicationStatus, InstanceId};

pub const DEMO_NAME: &str = "File Browser Demo";
pub const DEMO_DESCRIPTION: &str = "A demo application for browsing files and showing the current time";

/// How long `stop` waits for the UI server to exit before killing it.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the UI frontend as a managed child process.
///
/// Owns at most one child at a time. The instance publishes an
/// [`ApplicationDetail`] to the registry it was built with and withdraws it
/// in [`stop`](Application::stop), whatever the outcome of termination.
pub struct DemoApplication {
    id: InstanceId,
    config: AppConfig,
    registry: ApplicationRegistry,
    launcher: Arc<dyn ProcessLauncher>,
    process: Option<Box<dyn ManagedProcess>>,
    shutdown_timeout: Duration,
    last_termination: Option<Termination>,
}

impl DemoApplication {
    /// Config options understood by this application.
    pub fn config_schema() -> ConfigSchema {
        let mut schema = ConfigSchema::new();
        schema.insert(
            "port".to_string(),
            ConfigField::number("Port Number", "Port to run the application on", DEFAULT_PORT)
                .required()
                .in_section("server"),
        );
        schema
    }

    /// Create a controller that launches the UI server from the current binary.
    pub fn new(config: AppConfig, registry: ApplicationRegistry) -> Self {
        Self::with_launcher(config, registry, Arc::new(CommandLauncher::ui_server()))
    }

    /// Create a controller with a custom process launcher.
    pub fn with_launcher(config: AppConfig, registry: ApplicationRegistry, launcher: Arc<dyn ProcessLauncher>) -> Self {
        let id = InstanceId::next();
        registry.register(ApplicationDetail::new(id, DEMO_NAME, DEMO_DESCRIPTION, config.port));
        Self {
            id,
            config,
            registry,
            launcher,
            process: None,
            shutdown_timeout: SHUTDOWN_TIMEOUT,
            last_termination: None,
        }
    }

    /// Override the grace period used by `stop`.
    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// PID of the UI server while a handle is held.
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|process| process.pid())
    }

    /// How the most recent `stop` ended the process, if it had one.
    pub fn last_termination(&self) -> Option<Termination> {
        self.last_termination
    }

    /// Poll whether the UI server process is still alive.
    pub fn is_running(&mut self) -> bool {
        match self.process.as_mut().map(|process| process.is_alive()) {
            Some(Ok(alive)) => alive,
            Some(Err(error)) => {
                warn!("Failed to poll UI server process: {error}");
                false
            }
            None => false,
        }
    }

    fn ensure_registered(&self) {
        if !self.registry.is_current(self.id) {
            self.registry
                .register(ApplicationDetail::new(self.id, DEMO_NAME, DEMO_DESCRIPTION, self.config.port));
        }
    }

    fn set_status(&self, status: ApplicationStatus) {
        self.registry.update(self.id, |detail| detail.status = status);
    }

    async fn terminate_process(&mut self) -> Result<Option<Termination>, ApplicationError> {
        let Some(mut process) = self.process.take() else {
            debug!("No UI server process to stop");
            return Ok(None);
        };

        let pid = process.pid();
        let termination = process
            .terminate(self.shutdown_timeout)
            .await
            .map_err(ApplicationError::shutdown)?;
        match termination {
            Termination::AlreadyExited => info!(?pid, "UI server process had already exited"),
            Termination::Graceful => info!(?pid, "UI server process stopped"),
            Termination::Forced => warn!(?pid, timeout = ?self.shutdown_timeout, "UI server process killed after timeout"),
        }
        Ok(Some(termination))
    }
}

#[async_trait]
impl Application for DemoApplication {
    fn name(&self) -> &str {
        DEMO_NAME
    }

    fn description(&self) -> &str {
        DEMO_DESCRIPTION
    }

    async fn start(&mut self) -> Result<(), ApplicationError> {
        info!("Starting {DEMO_NAME}");
        if let Some(process) = self.process.as_mut()
            && process.is_alive()?
        {
            return Err(ApplicationError::AlreadyRunning { pid: process.pid() });
        }

        self.ensure_registered();
        self.set_status(ApplicationStatus::Starting);

        let port = self.config.port;
        match self.launcher.launch(port).await {
            Ok(process) => {
                let pid = process.pid();
                info!("UI server process started on port {port} with PID {pid:?}");
                self.registry.update(self.id, |detail| {
                    detail.status = ApplicationStatus::Running;
                    detail.pid = pid;
                    detail.last_start = Some(Utc::now());
                    detail.last_error = None;
                });
                self.process = Some(process);
                Ok(())
            }
            Err(source) => {
                error!("Failed to start UI server: {source}");
                self.registry.update(self.id, |detail| {
                    detail.status = ApplicationStatus::Error;
                    detail.last_error = Some(source.to_string());
                });
                Err(ApplicationError::launch(source))
            }
        }
    }

    async fn stop(&mut self) -> Result<(), ApplicationError> {
        info!("Stopping {DEMO_NAME}");
        self.set_status(ApplicationStatus::Stopping);

        let outcome = self.terminate_process().await;
        if let Ok(termination) = &outcome {
            self.last_termination = *termination;
        }

        self.registry.unregister(self.id);
        outcome.map(|_| ())
    }
}

impl std::fmt::Debug for DemoApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoApplication")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("pid", &self.pid())
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProcessError;

    struct FailingLauncher;

    #[async_trait]
    impl ProcessLauncher for FailingLauncher {
        async fn launch(&self, _port: u16) -> Result<Box<dyn ManagedProcess>, ProcessError> {
            Err(ProcessError::Spawn {
                program: "autotask-demo".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[test]
    fn schema_describes_port() {
        let schema = DemoApplication::config_schema();
        let port = schema.get("port").expect("port field");
        assert_eq!(port.label, "Port Number");
        assert_eq!(port.default, 8501);
        assert!(port.required);
        assert_eq!(port.section, "server");
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn construction_publishes_instance() {
        let registry = ApplicationRegistry::new();
        let app = DemoApplication::new(AppConfig { port: 8600 }, registry.clone());

        let current = registry.current().expect("registered");
        assert_eq!(current.id, app.id());
        assert_eq!(current.port, 8600);
        assert_eq!(current.status, ApplicationStatus::Stopped);
    }

    #[tokio::test]
    async fn stop_without_process_is_idempotent() {
        let registry = ApplicationRegistry::new();
        let mut app = DemoApplication::new(AppConfig::default(), registry.clone());

        app.stop().await.unwrap();
        app.stop().await.unwrap();
        assert!(registry.current().is_none());
        assert_eq!(app.last_termination(), None);
    }

    #[tokio::test]
    async fn launch_failure_propagates_and_marks_error() {
        let registry = ApplicationRegistry::new();
        let mut app = DemoApplication::with_launcher(AppConfig::default(), registry.clone(), Arc::new(FailingLauncher));

        let error = app.start().await.unwrap_err();
        assert!(matches!(error, ApplicationError::Launch { .. }));
        assert!(!app.is_running());

        let current = registry.current().expect("still registered");
        assert_eq!(current.status, ApplicationStatus::Error);
        assert!(current.last_error.is_some());

        app.stop().await.unwrap();
        assert!(registry.current().is_none());
    }

    #[cfg(unix)]
    mod child_process {
        use super::*;

        fn sleeper(registry: &ApplicationRegistry) -> DemoApplication {
            DemoApplication::with_launcher(
                AppConfig { port: 8501 },
                registry.clone(),
                Arc::new(CommandLauncher::new("sleep", ["30"])),
            )
        }

        #[tokio::test]
        async fn start_then_stop_terminates_gracefully() {
            let registry = ApplicationRegistry::new();
            let mut app = sleeper(&registry);

            app.start().await.unwrap();
            assert!(app.is_running());
            let current = registry.current().expect("registered");
            assert_eq!(current.status, ApplicationStatus::Running);
            assert_eq!(current.pid, app.pid());
            assert!(current.last_start.is_some());

            app.stop().await.unwrap();
            assert_eq!(app.last_termination(), Some(Termination::Graceful));
            assert!(!app.is_running());
            assert_eq!(app.pid(), None);
            assert!(registry.current().is_none());
        }

        #[tokio::test]
        async fn second_start_while_running_is_rejected() {
            let registry = ApplicationRegistry::new();
            let mut app = sleeper(&registry);

            app.start().await.unwrap();
            let pid = app.pid();
            let error = app.start().await.unwrap_err();
            assert!(matches!(error, ApplicationError::AlreadyRunning { pid: reported } if reported == pid));

            app.stop().await.unwrap();
        }

        #[tokio::test]
        async fn externally_killed_child_is_cleaned_up() {
            let registry = ApplicationRegistry::new();
            let mut app = sleeper(&registry);
            app.start().await.unwrap();

            let pid = app.pid().expect("pid") as libc::pid_t;
            // SAFETY: signalling our own child.
            assert_eq!(unsafe { libc::kill(pid, libc::SIGKILL) }, 0);
            for _ in 0..50 {
                if !app.is_running() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            assert!(!app.is_running());

            app.stop().await.unwrap();
            assert_eq!(app.last_termination(), Some(Termination::AlreadyExited));
            assert_eq!(app.pid(), None);
            assert!(registry.current().is_none());
        }

        #[tokio::test]
        async fn stubborn_child_is_force_killed() {
            let registry = ApplicationRegistry::new();
            let mut app = DemoApplication::with_launcher(
                AppConfig::default(),
                registry.clone(),
                Arc::new(CommandLauncher::new("sh", ["-c", "trap '' TERM; exec sleep 30"])),
            )
            .with_shutdown_timeout(Duration::from_millis(500));

            app.start().await.unwrap();
            // Let the shell install its trap before signalling.
            tokio::time::sleep(Duration::from_millis(300)).await;

            app.stop().await.unwrap();
            assert_eq!(app.last_termination(), Some(Termination::Forced));
            assert!(registry.current().is_none());
        }

        #[tokio::test]
        async fn restart_after_stop_registers_again() {
            let registry = ApplicationRegistry::new();
            let mut app = sleeper(&registry);

            app.start().await.unwrap();
            app.stop().await.unwrap();
            assert!(registry.current().is_none());

            app.start().await.unwrap();
            assert_eq!(registry.current().map(|detail| detail.status), Some(ApplicationStatus::Running));
            app.stop().await.unwrap();
        }
    }
}
