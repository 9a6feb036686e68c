use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Life-cycle status of a remote job as reported by its provider.
///
/// The steady states are `Ready`, `Running`, `Stopped` and `Deleted`.
/// `Creating`, `Starting`, `Stopping` and `Deleting` are the transitional states providers report while moving between them.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    /// No create request was issued yet.
    #[default]
    Uninitialized,
    Creating,
    Ready,
    Starting,
    Running,
    Stopping,
    Stopped,
    Deleting,
    Deleted,
    /// The provider gave up on the job, or the driver hit an unrecoverable error.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Uninitialized => "uninitialized",
            JobStatus::Creating => "creating",
            JobStatus::Ready => "ready",
            JobStatus::Starting => "starting",
            JobStatus::Running => "running",
            JobStatus::Stopping => "stopping",
            JobStatus::Stopped => "stopped",
            JobStatus::Deleting => "deleting",
            JobStatus::Deleted => "deleted",
            JobStatus::Failed => "failed",
        }
    }

    /// Statuses in which a provider reports load progress.
    pub fn reports_progress(&self) -> bool {
        matches!(self, JobStatus::Running | JobStatus::Stopped)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uninitialized" => Ok(JobStatus::Uninitialized),
            "creating" => Ok(JobStatus::Creating),
            "ready" => Ok(JobStatus::Ready),
            "starting" => Ok(JobStatus::Starting),
            "running" => Ok(JobStatus::Running),
            "stopping" => Ok(JobStatus::Stopping),
            "stopped" => Ok(JobStatus::Stopped),
            "deleting" => Ok(JobStatus::Deleting),
            "deleted" | "delete" => Ok(JobStatus::Deleted),
            "failed" => Ok(JobStatus::Failed),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Status of an endpoint connection test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionStatus {
    Testing,
    Successful,
    Failed,
    Deleting,
}

impl FromStr for ConnectionStatus {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testing" => Ok(ConnectionStatus::Testing),
            "successful" => Ok(ConnectionStatus::Successful),
            "failed" => Ok(ConnectionStatus::Failed),
            "deleting" => Ok(ConnectionStatus::Deleting),
            other => Err(ModelError::UnknownConnectionStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_strings() {
        assert_eq!("Ready".parse::<JobStatus>().unwrap(), JobStatus::Ready);
        assert_eq!(" running ".parse::<JobStatus>().unwrap(), JobStatus::Running);
        assert_eq!("delete".parse::<JobStatus>().unwrap(), JobStatus::Deleted);
        assert!(matches!(
            "modifying".parse::<JobStatus>(),
            Err(ModelError::UnknownStatus(_))
        ));
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for status in [
            JobStatus::Uninitialized,
            JobStatus::Creating,
            JobStatus::Ready,
            JobStatus::Starting,
            JobStatus::Running,
            JobStatus::Stopping,
            JobStatus::Stopped,
            JobStatus::Deleting,
            JobStatus::Deleted,
            JobStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<JobStatus>().unwrap(), status);
        }
    }

    #[test]
    fn only_running_and_stopped_report_progress() {
        assert!(JobStatus::Running.reports_progress());
        assert!(JobStatus::Stopped.reports_progress());
        assert!(!JobStatus::Creating.reports_progress());
    }

    #[test]
    fn connection_status_parses() {
        assert_eq!(
            "Successful".parse::<ConnectionStatus>().unwrap(),
            ConnectionStatus::Successful
        );
        assert!("unknown".parse::<ConnectionStatus>().is_err());
    }
}
