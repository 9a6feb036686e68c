mod domain;
pub use domain::{LABEL_PROVIDER, PARAM_SEPARATOR};
pub use domain::{
    CacheFlag, DataType, Direction, GlobalParams, Labels, Property, TaskIdentity, VarPool,
};

mod error;
pub use error::{ModelError, ModelResult};

mod params;
pub use params::TaskParams;

mod job;
pub use job::{ConnectionStatus, JobHandle, JobSnapshot, JobSpec, JobStatus, RemoteJob, StartMode};

mod strategy;
pub use strategy::{JitterStrategy, PollStrategy};
