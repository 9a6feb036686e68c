mod config;
pub use config::{DEFAULT_FINISHED_MARKER, DriverConfig};

mod context;
pub use context::DriverContext;

pub mod driver;
pub use driver::{
    EXIT_CODE_FAILURE, EXIT_CODE_SUCCESS, DriverError, JobOutcome, Operation, RemoteJobDriver,
};

mod id;
pub use id::make_run_id;

pub mod map;

pub mod metrics;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, OpOutcome, noop_metrics};

mod observer;
pub use observer::{JobObserver, ObserverHandle, TracingObserver, tracing_observer};

pub mod poller;
pub use poller::{StatusPoller, Verdict};

pub mod provider;
pub use provider::{JobProvider, ProviderError, ProviderHandle};

pub mod prelude {
    pub use crate::config::DriverConfig;
    pub use crate::context::DriverContext;
    pub use crate::driver::{DriverError, JobOutcome, RemoteJobDriver};
    pub use crate::provider::{JobProvider, ProviderError, ProviderHandle};
}
