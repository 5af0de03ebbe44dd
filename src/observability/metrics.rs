//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dash_requests_total` (counter): analytics requests by status code
//! - `dash_request_duration_seconds` (histogram): end-to-end handler latency
//! - `dash_backend_errors_total` (counter): failed backend reads by source
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed analytics request.
pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("dash_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("dash_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a failed backend read (`auth`, `stats`, `top_courses`, `enrollments`).
pub fn record_backend_error(source: &'static str) {
    metrics::counter!("dash_backend_errors_total", "source" => source).increment(1);
}
