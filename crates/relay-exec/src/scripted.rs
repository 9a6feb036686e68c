//! In-memory provider that replays scripted responses.
//!
//! Used by tests and by the demo agent in place of a real cloud provider.
use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use relay_core::{JobProvider, ProviderError};
use relay_model::{ConnectionStatus, JobHandle, JobSnapshot, JobSpec, JobStatus, StartMode};
use tracing::trace;

/// Provider methods that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptedMethod {
    Create,
    Describe,
    Start,
    Stop,
    Delete,
    TestConnection,
    DescribeConnection,
}

/// A recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Create(String),
    Describe(JobHandle),
    Start(JobHandle, StartMode),
    Stop(JobHandle),
    Delete(JobHandle),
    TestConnection { instance: String, endpoint: String },
    DescribeConnection { instance: String, endpoint: String },
}

impl ScriptedCall {
    pub fn method(&self) -> ScriptedMethod {
        match self {
            ScriptedCall::Create(_) => ScriptedMethod::Create,
            ScriptedCall::Describe(_) => ScriptedMethod::Describe,
            ScriptedCall::Start(..) => ScriptedMethod::Start,
            ScriptedCall::Stop(_) => ScriptedMethod::Stop,
            ScriptedCall::Delete(_) => ScriptedMethod::Delete,
            ScriptedCall::TestConnection { .. } => ScriptedMethod::TestConnection,
            ScriptedCall::DescribeConnection { .. } => ScriptedMethod::DescribeConnection,
        }
    }
}

/// Number of most recent calls kept for inspection.
pub const CALL_HISTORY: usize = 256;

#[derive(Default)]
struct Script {
    describe: VecDeque<Result<JobSnapshot, ProviderError>>,
    connection: VecDeque<Result<ConnectionStatus, ProviderError>>,
    failures: HashMap<ScriptedMethod, ProviderError>,
    calls: VecDeque<ScriptedCall>,
}

/// Replays describe results in order; the last one repeats forever.
///
/// An unscripted describe reports [`ProviderError::NotFound`], an unscripted connection test reports `Failed`.
pub struct ScriptedProvider {
    name: &'static str,
    script: Mutex<Script>,
}

impl ScriptedProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            script: Mutex::new(Script::default()),
        }
    }

    /// A job that is created, starts, loads to 100% and finishes.
    pub fn completing(name: &'static str) -> Self {
        Self::new(name)
            .then_status(JobStatus::Creating)
            .then_status(JobStatus::Ready)
            .then_status(JobStatus::Starting)
            .then_snapshot(JobSnapshot::new(JobStatus::Running).with_progress(0))
            .then_snapshot(JobSnapshot::new(JobStatus::Running).with_progress(40))
            .then_snapshot(JobSnapshot::new(JobStatus::Running).with_progress(85))
            .then_snapshot(
                JobSnapshot::new(JobStatus::Stopped)
                    .with_progress(100)
                    .with_stop_reason("Stop Reason FULL_LOAD_ONLY_FINISHED"),
            )
            .then_connection(ConnectionStatus::Testing)
            .then_connection(ConnectionStatus::Successful)
    }

    pub fn then_status(self, status: JobStatus) -> Self {
        self.then_snapshot(JobSnapshot::new(status))
    }

    pub fn then_snapshot(self, snapshot: JobSnapshot) -> Self {
        self.lock().describe.push_back(Ok(snapshot));
        self
    }

    pub fn then_describe_error(self, err: ProviderError) -> Self {
        self.lock().describe.push_back(Err(err));
        self
    }

    pub fn then_connection(self, status: ConnectionStatus) -> Self {
        self.lock().connection.push_back(Ok(status));
        self
    }

    /// Make every call of `method` fail with `err`.
    pub fn fail_on(self, method: ScriptedMethod, err: ProviderError) -> Self {
        self.lock().failures.insert(method, err);
        self
    }

    /// The last [`CALL_HISTORY`] calls, oldest first.
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.lock().calls.iter().cloned().collect()
    }

    /// Calls of `method` within the retained history.
    pub fn count(&self, method: ScriptedMethod) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.method() == method)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ScriptedCall) -> Result<(), ProviderError> {
        trace!(provider = self.name, ?call, "scripted call");
        let mut script = self.lock();
        let method = call.method();
        if script.calls.len() == CALL_HISTORY {
            script.calls.pop_front();
        }
        script.calls.push_back(call);
        match script.failures.get(&method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn replay<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[async_trait]
impl JobProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn create(&self, spec: &JobSpec) -> Result<JobHandle, ProviderError> {
        self.record(ScriptedCall::Create(spec.identifier.clone()))?;
        Ok(JobHandle::new(format!("arn:{}:task:{}", self.name, spec.identifier)))
    }

    async fn describe(&self, handle: &JobHandle) -> Result<JobSnapshot, ProviderError> {
        self.record(ScriptedCall::Describe(handle.clone()))?;
        replay(&mut self.lock().describe)
            .unwrap_or_else(|| Err(ProviderError::NotFound(handle.to_string())))
    }

    async fn start(&self, handle: &JobHandle, mode: StartMode) -> Result<(), ProviderError> {
        self.record(ScriptedCall::Start(handle.clone(), mode))
    }

    async fn stop(&self, handle: &JobHandle) -> Result<(), ProviderError> {
        self.record(ScriptedCall::Stop(handle.clone()))
    }

    async fn delete(&self, handle: &JobHandle) -> Result<(), ProviderError> {
        self.record(ScriptedCall::Delete(handle.clone()))
    }

    async fn test_connection(&self, instance: &str, endpoint: &str) -> Result<(), ProviderError> {
        self.record(ScriptedCall::TestConnection {
            instance: instance.to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    async fn describe_connection(
        &self,
        instance: &str,
        endpoint: &str,
    ) -> Result<ConnectionStatus, ProviderError> {
        self.record(ScriptedCall::DescribeConnection {
            instance: instance.to_string(),
            endpoint: endpoint.to_string(),
        })?;
        replay(&mut self.lock().connection).unwrap_or(Ok(ConnectionStatus::Failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn describe_replays_and_repeats_last() {
        let p = ScriptedProvider::new("test")
            .then_status(JobStatus::Creating)
            .then_status(JobStatus::Ready);
        let h = JobHandle::new("h");

        assert_eq!(p.describe(&h).await.unwrap().status, JobStatus::Creating);
        assert_eq!(p.describe(&h).await.unwrap().status, JobStatus::Ready);
        assert_eq!(p.describe(&h).await.unwrap().status, JobStatus::Ready);
        assert_eq!(p.count(ScriptedMethod::Describe), 3);
    }

    #[tokio::test]
    async fn unscripted_describe_is_not_found() {
        let p = ScriptedProvider::new("test");
        let err = p.describe(&JobHandle::new("h")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn scripted_failures_are_returned_and_recorded() {
        let p = ScriptedProvider::new("test")
            .fail_on(ScriptedMethod::Stop, ProviderError::InvalidState("not running".into()));
        let h = JobHandle::new("h");

        assert!(p.stop(&h).await.is_err());
        assert!(p.delete(&h).await.is_ok());
        assert_eq!(
            p.calls(),
            vec![ScriptedCall::Stop(h.clone()), ScriptedCall::Delete(h)]
        );
    }

    #[tokio::test]
    async fn call_history_is_bounded() {
        let p = ScriptedProvider::new("test").then_status(JobStatus::Running);
        let h = JobHandle::new("h");

        p.stop(&h).await.unwrap();
        for _ in 0..CALL_HISTORY {
            p.describe(&h).await.unwrap();
        }

        assert_eq!(p.calls().len(), CALL_HISTORY);
        assert_eq!(p.count(ScriptedMethod::Stop), 0);
        assert_eq!(p.count(ScriptedMethod::Describe), CALL_HISTORY);
    }

    #[tokio::test]
    async fn create_derives_handle_from_identifier() {
        let p = ScriptedProvider::new("dms");
        let h = p.create(&JobSpec::new("task1", json!({}))).await.unwrap();
        assert_eq!(h.as_str(), "arn:dms:task:task1");
    }
}
