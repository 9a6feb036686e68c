use serde::{Deserialize, Serialize};

use relay_model::{ModelError, PollStrategy};

/// Stop-reason suffix a provider reports for a job that ran to completion.
pub const DEFAULT_FINISHED_MARKER: &str = "FINISHED";

/// Driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverConfig {
    /// Polling policy for job life-cycle operations.
    pub poll: PollStrategy,
    /// Polling policy for endpoint connection tests.
    pub connection_poll: PollStrategy,
    /// A stopped job succeeded iff its stop reason ends with this marker.
    pub finished_marker: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            poll: PollStrategy::default(),
            connection_poll: PollStrategy {
                deadline_ms: 10 * 60 * 1_000,
                ..PollStrategy::default()
            },
            finished_marker: DEFAULT_FINISHED_MARKER.to_string(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.poll.validate()?;
        self.connection_poll.validate()?;
        if self.finished_marker.trim().is_empty() {
            return Err(ModelError::Invalid("finishedMarker cannot be empty".into()));
        }
        Ok(())
    }

    /// Replace both polling policies.
    pub fn with_poll(mut self, poll: PollStrategy) -> Self {
        self.connection_poll = poll.clone();
        self.poll = poll;
        self
    }
}
