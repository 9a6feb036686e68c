//! Interruptible status polling.
//!
//! [`StatusPoller`] drives a describe loop until a classifier says the observed value is final.
//! Every provider call and every sleep races against the cancellation token and the operation deadline.
mod backoff;
use backoff::Backoff;

use std::future::Future;
use std::time::Duration;

use relay_model::PollStrategy;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::{
    driver::{DriverError, Operation},
    metrics::MetricsHandle,
    provider::ProviderError,
};

/// Classification of one observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The target state was reached.
    Reached,
    /// A stop state was reached first.
    Failed,
    /// Keep polling.
    Pending,
}

/// Poll loop bound to one operation.
pub struct StatusPoller {
    op: Operation,
    strategy: PollStrategy,
    cancel: CancellationToken,
    started: Instant,
    deadline: Instant,
    metrics: Option<(&'static str, MetricsHandle)>,
}

impl StatusPoller {
    /// Start the operation clock now.
    pub fn new(op: Operation, strategy: PollStrategy, cancel: CancellationToken) -> Self {
        let started = Instant::now();
        Self {
            op,
            deadline: started + strategy.deadline(),
            strategy,
            cancel,
            started,
            metrics: None,
        }
    }

    /// Count failed provider calls against `provider`.
    pub fn with_metrics(mut self, provider: &'static str, metrics: MetricsHandle) -> Self {
        self.metrics = Some((provider, metrics));
        self
    }

    pub fn operation(&self) -> Operation {
        self.op
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn timeout(&self) -> DriverError {
        DriverError::Timeout {
            op: self.op,
            elapsed_ms: self.elapsed_ms(),
        }
    }

    fn record(&self, err: &ProviderError) {
        if let Some((provider, metrics)) = &self.metrics {
            metrics.record_provider_error(provider, err.kind());
        }
    }

    /// Run a single provider call under the cancellation token and the deadline.
    pub async fn call<T, F>(&self, fut: F) -> Result<T, DriverError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DriverError::Canceled(self.op)),
            _ = sleep_until(self.deadline) => Err(self.timeout()),
            res = fut => res.map_err(|e| {
                self.record(&e);
                DriverError::Provider(e)
            }),
        }
    }

    async fn pause(&self, delay: Duration) -> Result<(), DriverError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DriverError::Canceled(self.op)),
            _ = sleep_until(self.deadline) => Err(self.timeout()),
            _ = sleep(delay) => Ok(()),
        }
    }

    /// Describe until `classify` returns a final verdict.
    ///
    /// Transient describe faults are retried `describe_retries` times in a row; the budget resets after every successful describe.
    /// Any other provider error is returned to the caller unchanged.
    pub async fn poll<T, D, Fut, C>(
        &self,
        mut describe: D,
        mut classify: C,
    ) -> Result<(Verdict, T), DriverError>
    where
        D: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
        C: FnMut(&T) -> Verdict,
    {
        let mut backoff = Backoff::new(&self.strategy);
        let mut retries = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(DriverError::Canceled(self.op));
            }

            match self.call(describe()).await {
                Ok(value) => {
                    retries = 0;
                    let verdict = classify(&value);
                    if verdict != Verdict::Pending {
                        return Ok((verdict, value));
                    }
                    let delay = backoff.next_delay();
                    trace!(op = %self.op, delay_ms = delay.as_millis() as u64, "still pending");
                    self.pause(delay).await?;
                }
                Err(DriverError::Provider(err))
                    if err.is_transient() && retries < self.strategy.describe_retries =>
                {
                    let delay = self.strategy.retry_delay(retries);
                    retries += 1;
                    warn!(op = %self.op, retry = retries, error = %err, "describe failed, retrying");
                    self.pause(delay).await?;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
