use std::fmt;

use crate::driver::Operation;

/// Process-style exit code of a job that ran to completion.
pub const EXIT_CODE_SUCCESS: i32 = 0;
/// Process-style exit code of a job that did not.
pub const EXIT_CODE_FAILURE: i32 = -1;

/// Final result of [`super::RemoteJobDriver::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed {
        /// Operation that observed the failure.
        stage: Operation,
        reason: Option<String>,
    },
}

impl JobOutcome {
    pub fn failed(stage: Operation, reason: Option<String>) -> Self {
        JobOutcome::Failed { stage, reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            JobOutcome::Succeeded => EXIT_CODE_SUCCESS,
            JobOutcome::Failed { .. } => EXIT_CODE_FAILURE,
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Succeeded => f.write_str("succeeded"),
            JobOutcome::Failed {
                stage,
                reason: Some(reason),
            } => write!(f, "failed during {stage}: {reason}"),
            JobOutcome::Failed { stage, reason: None } => write!(f, "failed during {stage}"),
        }
    }
}
