//! Core types for application lifecycle management.

pub mod errors;
pub mod status;

pub use errors::{ApplicationError, ProcessError};
pub use status::{ApplicationDetail, ApplicationStatus, InstanceId};
