mod backoff;
mod jitter;

pub use backoff::to_backoff_policy;
pub use jitter::to_jitter_policy;
