use std::time::Duration;

use relay_model::PollStrategy;
use taskvisor::BackoffPolicy;

use super::to_jitter_policy;

/// Poll pacing as a taskvisor backoff: `intervalMs` first, growing by `factor` up to `maxIntervalMs`.
pub fn to_backoff_policy(s: &PollStrategy) -> BackoffPolicy {
    BackoffPolicy {
        first: Duration::from_millis(s.interval_ms),
        max: Duration::from_millis(s.max_interval_ms),
        jitter: to_jitter_policy(s.jitter),
        factor: s.factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::JitterStrategy;
    use taskvisor::JitterPolicy;

    #[test]
    fn maps_pacing_fields() {
        let s = PollStrategy {
            interval_ms: 250,
            max_interval_ms: 4_000,
            factor: 2.0,
            jitter: JitterStrategy::Full,
            ..Default::default()
        };
        let p = to_backoff_policy(&s);
        assert_eq!(p.first, Duration::from_millis(250));
        assert_eq!(p.max, Duration::from_millis(4_000));
        assert_eq!(p.factor, 2.0);
        assert_eq!(p.jitter, JitterPolicy::Full);
    }
}
