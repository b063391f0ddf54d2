//! Application lifecycle for the AutoTask demo.
//!
//! This crate implements the host-facing side of the demo: the
//! [`Application`] start/stop contract, the [`DemoApplication`] controller
//! that runs the UI frontend as a managed child process, the
//! [`ApplicationRegistry`] handle through which collaborators find the
//! active instance, and configuration loading.

pub mod application;
pub mod config;
pub mod process;
pub mod types;

pub use application::{Application, ApplicationRegistry, DemoApplication};
pub use config::{AppConfig, ConfigError};
pub use process::{CommandLauncher, ManagedProcess, ProcessLauncher, Termination};
pub use types::{ApplicationDetail, ApplicationError, ApplicationStatus, InstanceId, ProcessError};
