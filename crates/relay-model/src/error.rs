use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid task params: {0}")]
    InvalidParams(String),

    #[error("invalid var pool: {0}")]
    InvalidVarPool(String),

    #[error("unknown direction: {0}")]
    UnknownDirection(String),

    #[error("unknown data type: {0}")]
    UnknownDataType(String),

    #[error("unknown job status: {0}")]
    UnknownStatus(String),

    #[error("unknown connection status: {0}")]
    UnknownConnectionStatus(String),

    #[error("unknown start mode: {0}")]
    UnknownStartMode(String),

    #[error("unknown jitter strategy: {0}")]
    UnknownJitter(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
