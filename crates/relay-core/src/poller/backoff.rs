use std::time::Duration;

use relay_model::PollStrategy;
use taskvisor::{BackoffPolicy, JitterPolicy};

use crate::map::to_backoff_policy;

/// Delay sequence between describe calls of one poll loop.
///
/// Growth follows the un-jittered delay, so a small jittered sample never drags later delays down.
#[derive(Debug)]
pub(crate) struct Backoff {
    policy: BackoffPolicy,
    base: Option<Duration>,
    prev: Option<Duration>,
}

impl Backoff {
    pub(crate) fn new(strategy: &PollStrategy) -> Self {
        Self {
            policy: to_backoff_policy(strategy),
            base: None,
            prev: None,
        }
    }

    /// Delay to sleep before the next describe call.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let steady = BackoffPolicy {
            jitter: JitterPolicy::None,
            ..self.policy
        };
        let base = steady.next(self.base);
        self.base = Some(base);

        let delay = match self.policy.jitter {
            JitterPolicy::Decorrelated => self.policy.next(self.prev),
            jitter => jitter.apply(base),
        };
        self.prev = Some(delay);
        delay
    }
}
