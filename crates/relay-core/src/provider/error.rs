use thiserror::Error;

/// Failure reported by a [`super::JobProvider`] call.
///
/// Providers classify their own faults; the driver only decides what to do with each class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The job (or connection) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is not valid for the current state of the resource.
    #[error("invalid resource state: {0}")]
    InvalidState(String),

    /// Throttling, network hiccups and the like. Worth retrying.
    #[error("transient provider fault: {0}")]
    Transient(String),

    #[error("provider failure: {0}")]
    Fatal(String),
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }

    /// Label value for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotFound(_) => "not_found",
            ProviderError::InvalidState(_) => "invalid_state",
            ProviderError::Transient(_) => "transient",
            ProviderError::Fatal(_) => "fatal",
        }
    }
}
