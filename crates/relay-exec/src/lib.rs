mod error;
pub use error::ExecError;

mod metrics;
pub use metrics::{RUNNER_TYPE_REMOTE, task_error_to_outcome};

pub mod remote;
pub use remote::{ConnectivityCheck, RemoteRunner, RemoteTaskConfig, RemoteTaskParams, run_remote_task};

pub mod scripted;
pub use scripted::{ScriptedCall, ScriptedMethod, ScriptedProvider};
