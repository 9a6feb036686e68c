use std::sync::Arc;

use prometheus::{
    CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder, proto::MetricFamily,
};

use relay_core::{MetricsBackend, OpOutcome};

const NAMESPACE: &str = "relay";

/// Remote jobs run from seconds to hours.
const DURATION_BUCKETS: [f64; 10] = [
    0.1, 1.0, 5.0, 30.0, 60.0, 300.0, 900.0, 1_800.0, 3_600.0, 14_400.0,
];

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `provider`: one value per configured provider
/// - `operation`: "create", "start", "await", "stop", "delete", "test-connection"
/// - `outcome`: "success", "failure", "canceled", "timeout", "error"
/// - `error_kind`: "not_found", "invalid_state", "transient", "fatal"
#[derive(Clone)]
pub struct PrometheusMetrics {
    operations_started: CounterVec,
    operations_completed: CounterVec,
    operation_duration: HistogramVec,
    provider_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Register the relay metrics in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let operations_started = CounterVec::new(
            Opts::new("operations_started_total", "Driver operations started").namespace(NAMESPACE),
            &["provider", "operation"],
        )?;
        registry.register(Box::new(operations_started.clone()))?;

        let operations_completed = CounterVec::new(
            Opts::new("operations_completed_total", "Driver operations completed")
                .namespace(NAMESPACE),
            &["provider", "operation", "outcome"],
        )?;
        registry.register(Box::new(operations_completed.clone()))?;

        let operation_duration = HistogramVec::new(
            HistogramOpts::new(
                "operation_duration_seconds",
                "Wall time of driver operations, polling included",
            )
            .namespace(NAMESPACE)
            .buckets(DURATION_BUCKETS.to_vec()),
            &["provider", "operation"],
        )?;
        registry.register(Box::new(operation_duration.clone()))?;

        let provider_errors = CounterVec::new(
            Opts::new("provider_errors_total", "Failed provider calls, retried ones included")
                .namespace(NAMESPACE),
            &["provider", "error_kind"],
        )?;
        registry.register(Box::new(provider_errors.clone()))?;

        Ok(Self {
            operations_started,
            operations_completed,
            operation_duration,
            provider_errors,
            registry,
        })
    }

    /// Create the backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render all metrics in the text exposition format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.gather())
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_operation_started(&self, provider: &str, operation: &str) {
        self.operations_started
            .with_label_values(&[provider, operation])
            .inc();
    }

    fn record_operation_completed(
        &self,
        provider: &str,
        operation: &str,
        outcome: OpOutcome,
        duration_ms: u64,
    ) {
        self.operations_completed
            .with_label_values(&[provider, operation, outcome.as_label()])
            .inc();
        self.operation_duration
            .with_label_values(&[provider, operation])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_provider_error(&self, provider: &str, error_kind: &str) {
        self.provider_errors
            .with_label_values(&[provider, error_kind])
            .inc();
    }
}
