//! Remote job runner.
//!
//! Turns raw remote task parameters into `TaskRef` instances that drive one job
//! through its life cycle via [`relay_core::RemoteJobDriver`].
mod runner;
mod task;

pub use runner::{RemoteRunner, run_remote_task};
pub use task::{ConnectivityCheck, RemoteTaskConfig, RemoteTaskParams};
