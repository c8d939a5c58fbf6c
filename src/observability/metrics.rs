//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by status and outcome
//! - `relay_request_duration_seconds` (histogram): latency distribution
//!
//! Both carry `status` (the relay's own response code) and `outcome`
//! (success or the failing pipeline stage) labels.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(status: u16, outcome: &'static str, start_time: Instant) {
    let labels = [
        ("status", status.to_string()),
        ("outcome", outcome.to_string()),
    ];
    metrics::counter!("relay_requests_total", &labels).increment(1);
    metrics::histogram!("relay_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}
