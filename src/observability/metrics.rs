//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cedar_messages_routed_total` (counter): worker messages dispatched, by level
//! - `cedar_messages_dropped_total` (counter): messages lost, by reason
//! - `cedar_workers_online` (gauge): worker channels currently open
//! - `cedar_loggers_registered_total` (counter): coordinator registrations
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::logger::Level;

/// Install the Prometheus exporter on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_message_routed(level: Level) {
    counter!("cedar_messages_routed_total", "level" => level.as_str()).increment(1);
}

pub fn record_message_dropped(reason: &'static str) {
    counter!("cedar_messages_dropped_total", "reason" => reason).increment(1);
}

pub fn record_workers_online(count: u64) {
    gauge!("cedar_workers_online").set(count as f64);
}

pub fn record_logger_registered() {
    counter!("cedar_loggers_registered_total").increment(1);
}
