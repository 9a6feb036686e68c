//! Prometheus backend for relay driver metrics.
//!
//! [`PrometheusMetrics`] implements [`relay_core::MetricsBackend`]; inject it through
//! [`relay_core::DriverContext::with_metrics`] and expose [`PrometheusMetrics::gather`] (or
//! [`PrometheusMetrics::encode_text`]) from whatever HTTP surface the process already has.
//!
//! ## Metrics
//! - `relay_operations_started_total{provider, operation}` - Counter
//! - `relay_operations_completed_total{provider, operation, outcome}` - Counter
//! - `relay_operation_duration_seconds{provider, operation}` - Histogram
//! - `relay_provider_errors_total{provider, error_kind}` - Counter
mod backend;
pub use backend::PrometheusMetrics;
