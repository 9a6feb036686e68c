use std::sync::Arc;

use relay_model::{JobHandle, JobStatus};
use tracing::info;

/// Receives job progress while the driver polls.
///
/// Notifications are edge-triggered: the driver calls each hook only when the value changed since the previous poll.
pub trait JobObserver: Send + Sync {
    fn on_status(&self, _handle: &JobHandle, _status: JobStatus) {}

    fn on_progress(&self, handle: &JobHandle, percent: u8);
}

pub type ObserverHandle = Arc<dyn JobObserver>;

/// Observer that writes progress to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl JobObserver for TracingObserver {
    fn on_status(&self, handle: &JobHandle, status: JobStatus) {
        info!(job = %handle, status = %status, "job status changed");
    }

    fn on_progress(&self, handle: &JobHandle, percent: u8) {
        info!(job = %handle, percent, "job progress: {percent}%");
    }
}

#[inline]
pub fn tracing_observer() -> ObserverHandle {
    Arc::new(TracingObserver)
}
