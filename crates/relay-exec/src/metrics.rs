//! Metrics helpers for the remote runner.

use relay_core::OpOutcome;
use taskvisor::TaskError;

/// Remote runner type identifier for metrics and logs.
pub const RUNNER_TYPE_REMOTE: &str = "remote";

/// Convert TaskError to OpOutcome for metrics.
pub fn task_error_to_outcome(error: &TaskError) -> OpOutcome {
    match error {
        TaskError::Timeout { .. } => OpOutcome::Timeout,
        TaskError::Canceled => OpOutcome::Canceled,
        _ => OpOutcome::Failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_maps_to_canceled() {
        let err = TaskError::Canceled;
        assert_eq!(task_error_to_outcome(&err), OpOutcome::Canceled);
    }

    #[test]
    fn timeout_maps_to_timeout() {
        let err = TaskError::Timeout {
            timeout: std::time::Duration::from_secs(1),
        };
        assert_eq!(task_error_to_outcome(&err), OpOutcome::Timeout);
    }

    #[test]
    fn fail_maps_to_failure() {
        let err = TaskError::Fail {
            reason: "test".into(),
        };
        assert_eq!(task_error_to_outcome(&err), OpOutcome::Failure);
    }

    #[test]
    fn fatal_maps_to_failure() {
        let err = TaskError::Fatal {
            reason: "test".into(),
        };
        assert_eq!(task_error_to_outcome(&err), OpOutcome::Failure);
    }
}
