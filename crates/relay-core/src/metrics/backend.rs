use std::sync::Arc;

/// How a driver operation ended, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// The operation reached its target state.
    Success,
    /// The job entered a failure state.
    Failure,
    Canceled,
    /// The poll deadline expired.
    Timeout,
    /// A provider call failed.
    Error,
}

impl OpOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            OpOutcome::Success => "success",
            OpOutcome::Failure => "failure",
            OpOutcome::Canceled => "canceled",
            OpOutcome::Timeout => "timeout",
            OpOutcome::Error => "error",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected via [`crate::DriverContext`] and shared by every driver built from it.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the start of a blocking operation.
    ///
    /// # Arguments
    /// - `provider`: Provider name
    /// - `operation`: Operation label (`create`, `start`, ...)
    fn record_operation_started(&self, provider: &str, operation: &str);
    /// Record operation completion with outcome and duration.
    fn record_operation_completed(
        &self,
        provider: &str,
        operation: &str,
        outcome: OpOutcome,
        duration_ms: u64,
    );
    /// Record a failed provider call.
    ///
    /// Counted for every failed request, including ones that were retried.
    fn record_provider_error(&self, provider: &str, error_kind: &str);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
