//! Metrics collection and exposition.
//!
//! # Metrics
//! - `basement_boundary_transitions_total` (counter): status changes by boundary, status
//! - `basement_boundary_opened` (gauge): 1=opened, 0=otherwise
//! - `basement_boundary_reinit_total` (counter): timer-driven reinit attempts
//! - `basement_forced_shutdowns_total` (counter): shutdowns cut short by the deadline

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

use crate::boundary::Status;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_transition(boundary: &str, status: Status) {
    ::metrics::counter!(
        "basement_boundary_transitions_total",
        "boundary" => boundary.to_string(),
        "status" => status.as_str()
    )
    .increment(1);

    let opened = if status == Status::Opened { 1.0 } else { 0.0 };
    ::metrics::gauge!("basement_boundary_opened", "boundary" => boundary.to_string()).set(opened);
}

pub fn record_reinit(boundary: &str) {
    ::metrics::counter!("basement_boundary_reinit_total", "boundary" => boundary.to_string())
        .increment(1);
}

pub fn record_forced_shutdown() {
    ::metrics::counter!("basement_forced_shutdowns_total").increment(1);
}
