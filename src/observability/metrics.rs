//! Metrics collection and exposition.
//!
//! # Metrics
//! - `service_host_requests_total` (counter): requests by method, status
//! - `service_host_request_duration_seconds` (histogram): latency by method
//! - `service_host_lifecycle_state` (gauge): 0 starting, 1 available, 2 stopping, 3 stopped
//! - `service_host_hook_failures_total` (counter): failed notifications by phase
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::lifecycle::LifecycleState;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "service_host_requests_total",
        "method" => method.to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "service_host_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_state(state: LifecycleState) {
    metrics::gauge!("service_host_lifecycle_state").set(state.as_gauge());
}

pub fn record_hook_failure(phase: &'static str) {
    metrics::counter!("service_host_hook_failures_total", "phase" => phase).increment(1);
}
