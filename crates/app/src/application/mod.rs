//! The host-facing application contract and its demo implementation.

mod demo;
mod registry;

use async_trait::async_trait;

use crate::types::ApplicationError;

pub use demo::{DEMO_DESCRIPTION, DEMO_NAME, DemoApplication, SHUTDOWN_TIMEOUT};
pub use registry::ApplicationRegistry;

/// Lifecycle contract the host drives.
///
/// The host calls `start` once after construction and `stop` when the
/// application is disabled or the host shuts down. `stop` must be safe to
/// call repeatedly and without a prior `start`.
#[async_trait]
pub trait Application: Send {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn start(&mut self) -> Result<(), ApplicationError>;

    async fn stop(&mut self) -> Result<(), ApplicationError>;
}
