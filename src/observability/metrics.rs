//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_requests_total` (counter): person service calls by method, outcome
//! - `gateway_upstream_duration_seconds` (histogram): person service latency
//! - `gateway_notifications_total` (counter): notification sends by topic, outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a handled inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call to an upstream service.
pub fn record_upstream_call(method: &str, outcome: &'static str, start: Instant) {
    counter!(
        "gateway_upstream_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_upstream_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a notification delivery attempt.
pub fn record_notification(topic: &str, delivered: bool) {
    let outcome = if delivered { "delivered" } else { "failed" };
    counter!(
        "gateway_notifications_total",
        "topic" => topic.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
