use std::fmt;

use crate::{
    config::DriverConfig,
    metrics::MetricsHandle,
    observer::ObserverHandle,
};

/// Shared context handed to every driver.
#[derive(Clone)]
pub struct DriverContext {
    config: DriverConfig,
    metrics: MetricsHandle,
    observer: ObserverHandle,
}

impl DriverContext {
    pub fn new(config: DriverConfig, metrics: MetricsHandle, observer: ObserverHandle) -> Self {
        Self {
            config,
            metrics,
            observer,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    pub fn observer(&self) -> &ObserverHandle {
        &self.observer
    }

    /// Replace the configuration and return updated context.
    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_observer(mut self, observer: ObserverHandle) -> Self {
        self.observer = observer;
        self
    }
}

impl Default for DriverContext {
    fn default() -> Self {
        Self {
            config: DriverConfig::default(),
            metrics: crate::metrics::noop_metrics(),
            observer: crate::observer::tracing_observer(),
        }
    }
}

impl fmt::Debug for DriverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverContext")
            .field("config", &self.config)
            .field("metrics", &"<handle>")
            .field("observer", &"<handle>")
            .finish()
    }
}

impl fmt::Display for DriverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DriverContext(poll_deadline_ms={}, marker={})",
            self.config.poll.deadline_ms, self.config.finished_marker
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::PollStrategy;

    #[test]
    fn default_context_uses_default_config() {
        let ctx = DriverContext::default();
        assert_eq!(ctx.config(), &DriverConfig::default());
    }

    #[test]
    fn with_config_replaces_config() {
        let cfg = DriverConfig::default().with_poll(PollStrategy::fixed(5, 50));
        let ctx = DriverContext::default().with_config(cfg);
        assert_eq!(ctx.config().poll.interval_ms, 5);
        assert_eq!(ctx.config().connection_poll.deadline_ms, 50);
    }

    #[test]
    fn display_mentions_deadline_and_marker() {
        let cfg = DriverConfig::default().with_poll(PollStrategy::fixed(5, 50));
        let ctx = DriverContext::default().with_config(cfg);
        assert_eq!(ctx.to_string(), "DriverContext(poll_deadline_ms=50, marker=FINISHED)");
    }

    #[test]
    fn metrics_handle_can_be_cloned() {
        let ctx = DriverContext::default();
        let handle = ctx.metrics().clone();
        handle.record_operation_started("test", "create");
        handle.record_operation_completed("test", "create", crate::OpOutcome::Success, 10);
    }
}
