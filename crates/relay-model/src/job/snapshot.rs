use serde::{Deserialize, Serialize};

use crate::{JobHandle, JobStatus};

/// Result of a single describe call against a provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// Load progress in percent, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
    /// Free-text reason the job stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl JobSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, percent: u8) -> Self {
        self.progress_percent = Some(percent);
        self
    }

    pub fn with_stop_reason(mut self, reason: impl Into<String>) -> Self {
        self.stop_reason = Some(reason.into());
        self
    }
}

impl From<JobStatus> for JobSnapshot {
    fn from(status: JobStatus) -> Self {
        Self::new(status)
    }
}

/// Driver-side record of the job it owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteJob {
    pub handle: JobHandle,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<u8>,
}

impl RemoteJob {
    pub fn new(handle: JobHandle) -> Self {
        Self {
            handle,
            status: JobStatus::Uninitialized,
            progress_percent: None,
        }
    }

    /// Fold a describe result into the record.
    pub fn observe(&mut self, snapshot: &JobSnapshot) {
        self.status = snapshot.status;
        if snapshot.progress_percent.is_some() {
            self.progress_percent = snapshot.progress_percent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_keeps_last_known_progress() {
        let mut job = RemoteJob::new(JobHandle::new("arn:1"));
        job.observe(&JobSnapshot::new(JobStatus::Running).with_progress(40));
        job.observe(&JobSnapshot::new(JobStatus::Stopping));

        assert_eq!(job.status, JobStatus::Stopping);
        assert_eq!(job.progress_percent, Some(40));
    }

    #[test]
    fn snapshot_skips_absent_fields() {
        let json = serde_json::to_string(&JobSnapshot::new(JobStatus::Ready)).unwrap();
        assert_eq!(json, r#"{"status":"ready"}"#);
    }
}
