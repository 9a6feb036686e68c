use relay_core::DriverError;
use relay_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid task parameters: {0}")]
    InvalidSpec(String),

    #[error("invalid runner configuration: {0}")]
    InvalidRunnerConfig(String),

    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
}

impl From<ModelError> for ExecError {
    fn from(e: ModelError) -> Self {
        ExecError::InvalidSpec(e.to_string())
    }
}

impl From<serde_json::Error> for ExecError {
    fn from(e: serde_json::Error) -> Self {
        ExecError::InvalidSpec(e.to_string())
    }
}
