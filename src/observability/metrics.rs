//! Metrics collection and exposition.
//!
//! # Metrics
//! - `homes_proxy_requests_total` (counter): requests by route, status
//! - `homes_proxy_request_duration_seconds` (histogram): handler latency
//! - `homes_proxy_upstream_requests_total` (counter): upstream calls by endpoint, outcome
//! - `homes_proxy_upstream_duration_seconds` (histogram): upstream latency
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

/// Record one handled proxy request, labelled by matched route.
pub fn record_request(route: String, status: u16, start: Instant) {
    counter!(
        "homes_proxy_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("homes_proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream(endpoint: &'static str, outcome: &'static str, start: Instant) {
    counter!(
        "homes_proxy_upstream_requests_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("homes_proxy_upstream_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
