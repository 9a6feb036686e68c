mod handle;
pub use handle::JobHandle;

mod spec;
pub use spec::JobSpec;

mod status;
pub use status::{ConnectionStatus, JobStatus};

mod snapshot;
pub use snapshot::{JobSnapshot, RemoteJob};

mod mode;
pub use mode::StartMode;
