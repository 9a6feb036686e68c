mod jitter;
pub use jitter::JitterStrategy;

mod poll;
pub use poll::PollStrategy;
