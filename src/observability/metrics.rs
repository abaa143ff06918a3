//! Metrics recording.
//!
//! # Metrics
//! - `selector_health_checks_total` (counter): probes by address and result
//! - `selector_node_fail_count` (gauge): marker count after each probe
//! - `selector_selections_total` (counter): selections by group and result

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with an HTTP listener on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "metrics endpoint listening");
    Ok(())
}

pub fn record_health_check(address: &str, healthy: bool, fail_count: u64) {
    let result = if healthy { "pass" } else { "fail" };
    metrics::counter!(
        "selector_health_checks_total",
        "address" => address.to_string(),
        "result" => result
    )
    .increment(1);
    metrics::gauge!("selector_node_fail_count", "address" => address.to_string())
        .set(fail_count as f64);
}

pub fn record_selection(group: &str, selected: bool) {
    let result = if selected { "selected" } else { "none" };
    metrics::counter!(
        "selector_selections_total",
        "group" => group.to_string(),
        "result" => result
    )
    .increment(1);
}
