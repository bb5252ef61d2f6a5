//! Metrics collection and exposition.
//!
//! # Metrics
//! - `homedash_config_loads_total` (counter): loads by `outcome`
//! - `homedash_services` (gauge): services in the last successful load
//! - `homedash_config_load_duration_seconds` (histogram): time spent per load

use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
///
/// Returns `None` if a recorder is already installed in this process.
pub fn install_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Record the outcome of one configuration load.
pub fn record_load(outcome: &'static str, start: Instant) {
    ::metrics::counter!("homedash_config_loads_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("homedash_config_load_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_service_count(count: usize) {
    ::metrics::gauge!("homedash_services").set(count as f64);
}
