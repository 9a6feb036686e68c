use relay_model::{JobHandle, ModelError};
use thiserror::Error;

use crate::{driver::Operation, provider::ProviderError};

#[derive(Debug, Error)]
pub enum DriverError {
    /// The operation deadline expired before a final status was observed.
    #[error("{op} timed out after {elapsed_ms}ms")]
    Timeout { op: Operation, elapsed_ms: u64 },

    #[error("{0} canceled")]
    Canceled(Operation),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The operation needs a job, but none was created or attached.
    #[error("no remote job to operate on")]
    NoJob,

    #[error("driver already owns job {0}")]
    JobExists(JobHandle),

    #[error("invalid driver configuration: {0}")]
    InvalidConfig(#[from] ModelError),
}

impl DriverError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, DriverError::Canceled(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}
