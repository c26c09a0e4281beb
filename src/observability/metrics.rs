//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_invocations_total` (counter): completed invocations by variant, status
//! - `gateway_invocation_duration_seconds` (histogram): handler plus encoding latency
//! - `gateway_rejected_events_total` (counter): events that failed before a response, by error kind
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_invocation(variant: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_invocations_total",
        "variant" => variant,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_invocation_duration_seconds", "variant" => variant)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rejected(kind: &'static str) {
    metrics::counter!("gateway_rejected_events_total", "kind" => kind).increment(1);
}
