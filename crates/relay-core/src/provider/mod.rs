//! Capability interface to the system that actually executes remote jobs.
//!
//! Concrete adapters (cloud SDK wrappers, test doubles) implement [`JobProvider`] and are handed to the driver explicitly.
mod error;
pub use error::ProviderError;

use std::sync::Arc;

use async_trait::async_trait;
use relay_model::{ConnectionStatus, JobHandle, JobSnapshot, JobSpec, StartMode};

/// Remote job provider.
///
/// Every call is a single request; polling, retries and deadlines are the driver's business.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Provider name used in logs, run ids and metric labels.
    fn name(&self) -> &'static str;

    /// Issue a creation request and return the handle of the new job.
    async fn create(&self, spec: &JobSpec) -> Result<JobHandle, ProviderError>;

    /// Query the current state of a job.
    ///
    /// Must return [`ProviderError::NotFound`] once the job no longer exists.
    async fn describe(&self, handle: &JobHandle) -> Result<JobSnapshot, ProviderError>;

    async fn start(&self, handle: &JobHandle, mode: StartMode) -> Result<(), ProviderError>;

    async fn stop(&self, handle: &JobHandle) -> Result<(), ProviderError>;

    async fn delete(&self, handle: &JobHandle) -> Result<(), ProviderError>;

    /// Ask the provider to test connectivity between an execution instance and an endpoint.
    async fn test_connection(&self, instance: &str, endpoint: &str) -> Result<(), ProviderError>;

    /// Current status of the connection test for the pair.
    async fn describe_connection(
        &self,
        instance: &str,
        endpoint: &str,
    ) -> Result<ConnectionStatus, ProviderError>;
}

/// Shared handle to a provider.
pub type ProviderHandle = Arc<dyn JobProvider>;
