use crate::metrics::backend::{MetricsBackend, OpOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_operation_started(&self, _: &str, _: &str) {}

    #[inline(always)]
    fn record_operation_completed(&self, _: &str, _: &str, _: OpOutcome, _: u64) {}

    #[inline(always)]
    fn record_provider_error(&self, _: &str, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_is_zero_size() {
        assert_eq!(std::mem::size_of::<NoOpMetrics>(), 0);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(OpOutcome::Success.as_label(), "success");
        assert_eq!(OpOutcome::Timeout.as_label(), "timeout");
        assert_eq!(OpOutcome::Error.as_label(), "error");
    }
}
