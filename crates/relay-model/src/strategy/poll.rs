use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::{
    JitterStrategy,
    error::{ModelError, ModelResult},
};

/// Pacing, deadline and retry policy for status polling.
///
/// The delay before poll `n` (zero-based) is `interval_ms * factor^n`, capped at `max_interval_ms`, then jittered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PollStrategy {
    /// Delay after the first describe call.
    pub interval_ms: u64,
    /// Upper bound for a single delay.
    pub max_interval_ms: u64,
    /// Growth factor applied per poll.
    pub factor: f64,
    pub jitter: JitterStrategy,
    /// Overall budget of one blocking operation.
    pub deadline_ms: u64,
    /// How many times a transiently failing describe call is retried before giving up.
    pub describe_retries: u32,
    /// First delay between describe retries; doubles per retry.
    pub retry_backoff_ms: u64,
}

impl Default for PollStrategy {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            max_interval_ms: 30_000,
            factor: 1.5,
            jitter: JitterStrategy::Equal,
            deadline_ms: 24 * 60 * 60 * 1_000,
            describe_retries: 3,
            retry_backoff_ms: 500,
        }
    }
}

impl PollStrategy {
    /// A fixed-interval strategy without jitter.
    pub fn fixed(interval_ms: u64, deadline_ms: u64) -> Self {
        Self {
            interval_ms,
            max_interval_ms: interval_ms,
            factor: 1.0,
            jitter: JitterStrategy::None,
            deadline_ms,
            ..Default::default()
        }
    }

    /// Check that the values describe a usable policy.
    pub fn validate(&self) -> ModelResult<()> {
        if self.interval_ms == 0 {
            return Err(ModelError::Invalid("poll intervalMs cannot be zero".into()));
        }
        if self.deadline_ms == 0 {
            return Err(ModelError::Invalid("poll deadlineMs cannot be zero".into()));
        }
        if self.max_interval_ms < self.interval_ms {
            return Err(ModelError::Invalid(
                "poll maxIntervalMs must be >= intervalMs".into(),
            ));
        }
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(ModelError::Invalid("poll factor must be >= 1.0".into()));
        }
        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Un-jittered delay after poll number `attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exp = self.factor.powi(attempt.min(64) as i32);
        let ms = (self.interval_ms as f64 * exp).min(self.max_interval_ms as f64);
        Duration::from_millis(ms as u64)
    }

    /// Delay before describe retry number `retry` (zero-based).
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let ms = self
            .retry_backoff_ms
            .saturating_mul(1u64 << retry.min(16))
            .min(self.max_interval_ms.max(self.retry_backoff_ms));
        Duration::from_millis(ms)
    }
}
