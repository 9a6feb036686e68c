use std::time::Duration;

use taskvisor::{TaskError, TaskFn, TaskRef};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use relay_core::{
    DriverContext, DriverError, JobOutcome, ProviderError, ProviderHandle, RemoteJobDriver,
    make_run_id,
};
use relay_model::GlobalParams;

use crate::{
    ExecError,
    metrics::{RUNNER_TYPE_REMOTE, task_error_to_outcome},
    remote::task::{RemoteTaskConfig, RemoteTaskParams},
};

/// Runner that executes remote task parameters as supervised jobs on one provider.
pub struct RemoteRunner {
    /// Runner name.
    name: &'static str,
    provider: ProviderHandle,
    ctx: DriverContext,
    /// Values available to payload placeholders.
    globals: GlobalParams,
}

impl RemoteRunner {
    pub fn new(name: &'static str, provider: ProviderHandle, ctx: DriverContext) -> Self {
        Self {
            name,
            provider,
            ctx,
            globals: GlobalParams::new(),
        }
    }

    pub fn with_globals(mut self, globals: GlobalParams) -> Self {
        self.globals = globals;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parse and resolve raw task parameters.
    pub fn build_task_config(&self, raw_params: &str) -> Result<RemoteTaskConfig, ExecError> {
        self.ctx
            .config()
            .validate()
            .map_err(|e| ExecError::InvalidRunnerConfig(e.to_string()))?;
        let params = RemoteTaskParams::parse(raw_params)?;
        Ok(params.resolve(&self.globals))
    }

    /// Build a supervised task for the given raw parameters.
    ///
    /// Malformed parameters fail here, before any provider call.
    pub fn build_task(&self, raw_params: &str) -> Result<TaskRef, ExecError> {
        let task_cfg = self.build_task_config(raw_params)?;
        let task_name = make_run_id(self.name);
        task_cfg.trace_state(&task_name);

        let provider = self.provider.clone();
        let ctx = self.ctx.clone();
        let name = task_name.clone();

        let task: TaskRef = TaskFn::arc(task_name, move |cancel: CancellationToken| {
            let task_cfg = task_cfg.clone();
            let provider = provider.clone();
            let ctx = ctx.clone();
            let name = name.clone();

            async move {
                trace!(task = %name, runner = RUNNER_TYPE_REMOTE, "starting remote task");
                let res = run_remote_task(&task_cfg, provider, ctx, cancel).await;
                match &res {
                    Ok(outcome) => debug!(task = %name, exit_code = outcome.exit_code(), "remote task finished"),
                    Err(e) => debug!(
                        task = %name,
                        outcome = task_error_to_outcome(e).as_label(),
                        error = %e,
                        "remote task ended"
                    ),
                }
                res.map(|_| ())
            }
        });
        Ok(task)
    }
}

/// Drive one remote task to its end.
///
/// Order: connectivity checks, create (or attach), start, await completion, optional delete.
/// Cancellation and expired deadlines stop the job on a best-effort basis and are reported as
/// [`TaskError::Canceled`] and [`TaskError::Timeout`].
pub async fn run_remote_task(
    cfg: &RemoteTaskConfig,
    provider: ProviderHandle,
    ctx: DriverContext,
    cancel: CancellationToken,
) -> Result<JobOutcome, TaskError> {
    let mut driver = RemoteJobDriver::new(provider, ctx)
        .map_err(to_task_error)?
        .with_cancel(cancel);

    for check in &cfg.connectivity {
        let ok = driver
            .test_connectivity(&check.instance, &check.endpoint)
            .await
            .map_err(to_task_error)?;
        if !ok {
            return Err(TaskError::Fail {
                reason: format!(
                    "connection test failed: {} -> {}",
                    check.instance, check.endpoint
                ),
            });
        }
    }

    if let Some(handle) = &cfg.restart {
        driver.attach(handle.clone()).map_err(to_task_error)?;
    }

    let outcome = match driver.run(cfg.spec.as_ref(), cfg.start_mode).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_canceled() || e.is_timeout() => {
            info!(run = %driver.run_id(), reason = %e, "remote task interrupted, stopping job");
            match driver.abort().await {
                Ok(true) => {}
                Ok(false) => warn!(run = %driver.run_id(), "interrupted job did not stop"),
                Err(stop_err) => {
                    warn!(run = %driver.run_id(), error = %stop_err, "failed to stop interrupted job")
                }
            }
            return Err(to_task_error(e));
        }
        Err(e) => return Err(to_task_error(e)),
    };

    if cfg.delete_on_finish {
        match driver.delete().await {
            Ok(true) => debug!(run = %driver.run_id(), "job deleted"),
            Ok(false) => warn!(run = %driver.run_id(), "job delete did not complete"),
            Err(e) => warn!(run = %driver.run_id(), error = %e, "job delete failed"),
        }
    }

    if outcome.is_success() {
        Ok(outcome)
    } else {
        Err(TaskError::Fail {
            reason: outcome.to_string(),
        })
    }
}

/// Provider refusals and setup mistakes are fatal; everything else may succeed on a retry.
fn to_task_error(e: DriverError) -> TaskError {
    match e {
        DriverError::Canceled(_) => TaskError::Canceled,
        DriverError::Timeout { elapsed_ms, .. } => TaskError::Timeout {
            timeout: Duration::from_millis(elapsed_ms),
        },
        DriverError::Provider(ProviderError::Fatal(_))
        | DriverError::InvalidConfig(_)
        | DriverError::NoJob
        | DriverError::JobExists(_) => TaskError::Fatal {
            reason: e.to_string(),
        },
        other => TaskError::Fail {
            reason: other.to_string(),
        },
    }
}
