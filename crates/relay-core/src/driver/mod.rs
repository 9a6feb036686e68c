//! Life-cycle driver for a single remote job.
//!
//! [`RemoteJobDriver`] issues provider requests and then blocks (asynchronously) on a [`StatusPoller`]
//! until the job reaches the target status of the operation, hits a stop status, the deadline expires,
//! or the cancellation token fires.
mod error;
pub use error::DriverError;

mod operation;
pub use operation::Operation;

mod outcome;
pub use outcome::{EXIT_CODE_FAILURE, EXIT_CODE_SUCCESS, JobOutcome};

use relay_model::{
    ConnectionStatus, JobHandle, JobSnapshot, JobSpec, JobStatus, PollStrategy, RemoteJob,
    StartMode,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    context::DriverContext,
    id::make_run_id,
    metrics::OpOutcome,
    observer::JobObserver,
    poller::{StatusPoller, Verdict},
    provider::{JobProvider, ProviderError, ProviderHandle},
};

/// Statuses that end a create, await or stop wait unsuccessfully.
const STOP_SET: [JobStatus; 3] = [JobStatus::Failed, JobStatus::Deleting, JobStatus::Deleted];

/// A start wait also ends when the job stopped before it was seen running.
const START_STOP_SET: [JobStatus; 4] = [
    JobStatus::Stopped,
    JobStatus::Failed,
    JobStatus::Deleting,
    JobStatus::Deleted,
];

/// Drives one remote job through create, start, completion, stop and delete.
///
/// Every operation takes `&mut self`: a driver owns its job record exclusively.
pub struct RemoteJobDriver {
    provider: ProviderHandle,
    ctx: DriverContext,
    cancel: CancellationToken,
    run_id: String,
    job: Option<RemoteJob>,
    stop_reason: Option<String>,
    /// A start request was sent; the job may be running even before a describe shows it.
    start_requested: bool,
}

impl RemoteJobDriver {
    /// Create a driver without a job.
    ///
    /// Fails if the context carries an unusable polling configuration.
    pub fn new(provider: ProviderHandle, ctx: DriverContext) -> Result<Self, DriverError> {
        ctx.config().validate()?;
        let run_id = make_run_id(provider.name());
        Ok(Self {
            provider,
            ctx,
            cancel: CancellationToken::new(),
            run_id,
            job: None,
            stop_reason: None,
            start_requested: false,
        })
    }

    /// Use an external cancellation token for every blocking operation.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn job(&self) -> Option<&RemoteJob> {
        self.job.as_ref()
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.job.as_ref().map(|j| &j.handle)
    }

    /// Stop reason reported by the last completion wait.
    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    /// Adopt an existing job instead of creating one.
    pub fn attach(&mut self, handle: JobHandle) -> Result<(), DriverError> {
        if let Some(job) = &self.job {
            return Err(DriverError::JobExists(job.handle.clone()));
        }
        info!(run = %self.run_id, job = %handle, "attached to existing job");
        self.job = Some(RemoteJob::new(handle));
        Ok(())
    }

    /// Create the job and wait until it is `Ready`.
    ///
    /// Returns `false` if the job entered a stop status first.
    #[instrument(level = "debug", skip_all, fields(run = %self.run_id, identifier = %spec.identifier))]
    pub async fn create(&mut self, spec: &JobSpec) -> Result<bool, DriverError> {
        let started = self.begin(Operation::Create);
        let res = self.create_inner(spec).await;
        self.complete(Operation::Create, started, res)
    }

    async fn create_inner(&mut self, spec: &JobSpec) -> Result<bool, DriverError> {
        if let Some(job) = &self.job {
            return Err(DriverError::JobExists(job.handle.clone()));
        }
        let poller = self.poller(Operation::Create);
        let handle = poller.call(self.provider.create(spec)).await?;
        info!(run = %self.run_id, job = %handle, "create requested");

        let mut job = RemoteJob::new(handle);
        job.status = JobStatus::Creating;
        self.job = Some(job);

        let (verdict, _) = self
            .await_status(&poller, false, |s| classify(s.status, &[JobStatus::Ready], &STOP_SET))
            .await?;
        Ok(verdict == Verdict::Reached)
    }

    /// Start the job and wait until it is `Running`.
    ///
    /// Returns `false` if the job stopped or failed before it was seen running.
    #[instrument(level = "debug", skip_all, fields(run = %self.run_id, mode = %mode))]
    pub async fn start(&mut self, mode: StartMode) -> Result<bool, DriverError> {
        let started = self.begin(Operation::Start);
        let res = self.start_inner(mode).await;
        self.complete(Operation::Start, started, res)
    }

    async fn start_inner(&mut self, mode: StartMode) -> Result<bool, DriverError> {
        let handle = self.require_handle()?;
        let poller = self.poller(Operation::Start);
        self.start_requested = true;
        poller.call(self.provider.start(&handle, mode)).await?;
        info!(run = %self.run_id, job = %handle, mode = %mode, "start requested");

        let (verdict, _) = self
            .await_status(&poller, false, |s| {
                classify(s.status, &[JobStatus::Running], &START_STOP_SET)
            })
            .await?;
        Ok(verdict == Verdict::Reached)
    }

    /// Wait until the started job stops on its own.
    ///
    /// Succeeds iff the reported stop reason ends with the configured finished marker.
    #[instrument(level = "debug", skip_all, fields(run = %self.run_id))]
    pub async fn await_completion(&mut self) -> Result<bool, DriverError> {
        let started = self.begin(Operation::Await);
        let res = self.await_inner().await;
        self.complete(Operation::Await, started, res)
    }

    async fn await_inner(&mut self) -> Result<bool, DriverError> {
        let poller = self.poller(Operation::Await);
        let (verdict, snapshot) = self
            .await_status(&poller, false, |s| classify(s.status, &[JobStatus::Stopped], &STOP_SET))
            .await?;
        self.stop_reason = snapshot.stop_reason;
        if verdict != Verdict::Reached {
            return Ok(false);
        }

        let marker = self.ctx.config().finished_marker.as_str();
        match self.stop_reason.as_deref() {
            Some(reason) if reason.ends_with(marker) => {
                info!(run = %self.run_id, reason, "job finished");
                Ok(true)
            }
            Some(reason) => {
                warn!(run = %self.run_id, reason, "job stopped before finishing");
                Ok(false)
            }
            None => {
                warn!(run = %self.run_id, "job stopped without a stop reason");
                Ok(false)
            }
        }
    }

    /// Stop the job and wait until it is `Stopped`.
    #[instrument(level = "debug", skip_all, fields(run = %self.run_id))]
    pub async fn stop(&mut self) -> Result<bool, DriverError> {
        let started = self.begin(Operation::Stop);
        let poller = self.poller(Operation::Stop);
        let res = self.stop_inner(&poller).await;
        self.complete(Operation::Stop, started, res)
    }

    async fn stop_inner(&mut self, poller: &StatusPoller) -> Result<bool, DriverError> {
        let handle = self.require_handle()?;
        poller.call(self.provider.stop(&handle)).await?;
        info!(run = %self.run_id, job = %handle, "stop requested");

        let (verdict, _) = self
            .await_status(poller, false, |s| classify(s.status, &[JobStatus::Stopped], &STOP_SET))
            .await?;
        Ok(verdict == Verdict::Reached)
    }

    /// Delete the job and wait until it is gone.
    ///
    /// A job the provider no longer knows about counts as deleted.
    #[instrument(level = "debug", skip_all, fields(run = %self.run_id))]
    pub async fn delete(&mut self) -> Result<bool, DriverError> {
        let started = self.begin(Operation::Delete);
        let res = self.delete_inner().await;
        self.complete(Operation::Delete, started, res)
    }

    async fn delete_inner(&mut self) -> Result<bool, DriverError> {
        let handle = self.require_handle()?;
        let poller = self.poller(Operation::Delete);
        match poller.call(self.provider.delete(&handle)).await {
            Ok(()) => info!(run = %self.run_id, job = %handle, "delete requested"),
            Err(DriverError::Provider(ProviderError::NotFound(msg))) => {
                debug!(run = %self.run_id, job = %handle, %msg, "job already gone");
                self.mark(JobStatus::Deleted);
                return Ok(true);
            }
            Err(e) => return Err(e),
        }

        let (verdict, _) = self
            .await_status(&poller, true, |s| {
                classify(s.status, &[JobStatus::Deleted], &[JobStatus::Failed])
            })
            .await?;
        Ok(verdict == Verdict::Reached)
    }

    /// Test connectivity between an execution instance and an endpoint.
    ///
    /// An invalid-state refusal of the test request (a test already running) is logged and the wait continues.
    #[instrument(level = "debug", skip_all, fields(run = %self.run_id, instance = %instance, endpoint = %endpoint))]
    pub async fn test_connectivity(&self, instance: &str, endpoint: &str) -> Result<bool, DriverError> {
        let started = self.begin(Operation::TestConnection);
        let res = self.test_connectivity_inner(instance, endpoint).await;
        self.record(Operation::TestConnection, started, &res);
        res
    }

    async fn test_connectivity_inner(
        &self,
        instance: &str,
        endpoint: &str,
    ) -> Result<bool, DriverError> {
        let poller = self.poller_with(Operation::TestConnection, &self.ctx.config().connection_poll);
        match poller.call(self.provider.test_connection(instance, endpoint)).await {
            Ok(()) => debug!(instance, endpoint, "connection test requested"),
            Err(DriverError::Provider(ProviderError::InvalidState(msg))) => {
                warn!(instance, endpoint, %msg, "connection test refused, waiting for the running one");
            }
            Err(e) => return Err(e),
        }

        let provider: &dyn JobProvider = self.provider.as_ref();
        let (verdict, status) = poller
            .poll(
                move || provider.describe_connection(instance, endpoint),
                |status| match status {
                    ConnectionStatus::Successful => Verdict::Reached,
                    ConnectionStatus::Testing => Verdict::Pending,
                    _ => Verdict::Failed,
                },
            )
            .await?;

        if verdict == Verdict::Reached {
            info!(instance, endpoint, "connection test succeeded");
        } else {
            warn!(instance, endpoint, ?status, "connection test failed");
        }
        Ok(verdict == Verdict::Reached)
    }

    /// Create (unless a job is attached), start and wait for completion.
    pub async fn run(&mut self, spec: Option<&JobSpec>, mode: StartMode) -> Result<JobOutcome, DriverError> {
        if self.job.is_none() {
            let spec = spec.ok_or(DriverError::NoJob)?;
            if !self.create(spec).await? {
                return Ok(self.failed(Operation::Create));
            }
        }
        if !self.start(mode).await? {
            if self.status() != Some(JobStatus::Stopped) {
                return Ok(self.failed(Operation::Start));
            }
            // Ran through between two polls; the stop reason decides.
            debug!(run = %self.run_id, "job stopped before it was seen running");
        }
        if !self.await_completion().await? {
            return Ok(JobOutcome::failed(Operation::Await, self.stop_reason.clone()));
        }
        Ok(JobOutcome::Succeeded)
    }

    /// Best-effort stop after cancellation or a deadline.
    ///
    /// Runs under a fresh token so an already-cancelled driver can still reach the provider.
    /// A job is stopped when it was seen starting or running, or when a start request was sent and
    /// the job has not been seen settling since. Anything else is left alone.
    pub async fn abort(&mut self) -> Result<bool, DriverError> {
        let Some(job) = &self.job else {
            return Ok(true);
        };
        let live = match job.status {
            JobStatus::Starting | JobStatus::Running => true,
            JobStatus::Stopping
            | JobStatus::Stopped
            | JobStatus::Deleting
            | JobStatus::Deleted
            | JobStatus::Failed => false,
            JobStatus::Uninitialized | JobStatus::Creating | JobStatus::Ready => self.start_requested,
        };
        if !live {
            debug!(run = %self.run_id, status = %job.status, "nothing to abort");
            return Ok(true);
        }

        warn!(run = %self.run_id, job = %job.handle, "aborting job");
        let started = self.begin(Operation::Stop);
        let poller = StatusPoller::new(
            Operation::Stop,
            self.ctx.config().poll.clone(),
            CancellationToken::new(),
        )
        .with_metrics(self.provider.name(), self.ctx.metrics().clone());
        let res = self.stop_inner(&poller).await;
        self.complete(Operation::Stop, started, res)
    }

    fn poller(&self, op: Operation) -> StatusPoller {
        self.poller_with(op, &self.ctx.config().poll)
    }

    fn poller_with(&self, op: Operation, strategy: &PollStrategy) -> StatusPoller {
        StatusPoller::new(op, strategy.clone(), self.cancel.clone())
            .with_metrics(self.provider.name(), self.ctx.metrics().clone())
    }

    /// Poll the job status, folding each snapshot into the job record.
    async fn await_status<C>(
        &mut self,
        poller: &StatusPoller,
        gone_is_deleted: bool,
        mut classify: C,
    ) -> Result<(Verdict, JobSnapshot), DriverError>
    where
        C: FnMut(&JobSnapshot) -> Verdict,
    {
        let provider: &dyn JobProvider = self.provider.as_ref();
        let observer = self.ctx.observer().clone();
        let job = self.job.as_mut().ok_or(DriverError::NoJob)?;
        let handle = job.handle.clone();
        let handle = &handle;

        poller
            .poll(
                move || async move {
                    match provider.describe(handle).await {
                        Err(ProviderError::NotFound(_)) if gone_is_deleted => {
                            Ok(JobSnapshot::new(JobStatus::Deleted))
                        }
                        other => other,
                    }
                },
                |snapshot| {
                    track(job, observer.as_ref(), snapshot);
                    classify(snapshot)
                },
            )
            .await
    }

    fn status(&self) -> Option<JobStatus> {
        self.job.as_ref().map(|j| j.status)
    }

    fn require_handle(&self) -> Result<JobHandle, DriverError> {
        self.handle().cloned().ok_or(DriverError::NoJob)
    }

    fn mark(&mut self, status: JobStatus) {
        if let Some(job) = self.job.as_mut() {
            job.status = status;
        }
    }

    fn failed(&self, stage: Operation) -> JobOutcome {
        let status = self.job.as_ref().map(|j| j.status).unwrap_or_default();
        JobOutcome::failed(stage, Some(format!("job ended in status {status}")))
    }

    fn begin(&self, op: Operation) -> Instant {
        debug!(run = %self.run_id, op = %op, "operation started");
        self.ctx
            .metrics()
            .record_operation_started(self.provider.name(), op.as_label());
        Instant::now()
    }

    fn record(&self, op: Operation, started: Instant, res: &Result<bool, DriverError>) {
        let outcome = match res {
            Ok(true) => OpOutcome::Success,
            Ok(false) => OpOutcome::Failure,
            Err(DriverError::Timeout { .. }) => OpOutcome::Timeout,
            Err(DriverError::Canceled(_)) => OpOutcome::Canceled,
            Err(_) => OpOutcome::Error,
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        self.ctx.metrics().record_operation_completed(
            self.provider.name(),
            op.as_label(),
            outcome,
            duration_ms,
        );
        debug!(run = %self.run_id, op = %op, outcome = outcome.as_label(), duration_ms, "operation completed");
    }

    fn complete(
        &mut self,
        op: Operation,
        started: Instant,
        res: Result<bool, DriverError>,
    ) -> Result<bool, DriverError> {
        self.record(op, started, &res);
        if let Err(DriverError::Provider(err)) = &res {
            warn!(run = %self.run_id, op = %op, error = %err, "provider failure, marking job failed");
            self.mark(JobStatus::Failed);
        }
        res
    }
}

fn classify(status: JobStatus, target: &[JobStatus], stop: &[JobStatus]) -> Verdict {
    if target.contains(&status) {
        Verdict::Reached
    } else if stop.contains(&status) {
        Verdict::Failed
    } else {
        Verdict::Pending
    }
}

/// Fold a snapshot into the job record, notifying the observer of changes only.
fn track(job: &mut RemoteJob, observer: &dyn JobObserver, snapshot: &JobSnapshot) {
    if job.status != snapshot.status {
        observer.on_status(&job.handle, snapshot.status);
    }
    if snapshot.status.reports_progress() {
        if let Some(percent) = snapshot.progress_percent {
            if job.progress_percent != Some(percent) {
                observer.on_progress(&job.handle, percent);
            }
        }
    }
    job.observe(snapshot);
}
