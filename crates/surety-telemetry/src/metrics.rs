//! Prometheus counters for the FlightSurety client.
//!
//! All metrics follow the naming convention: `fs_<area>_<metric>_total`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Once;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Contract calls by method and outcome
    pub static ref CHAIN_CALLS: CounterVec = CounterVec::new(
        Opts::new("fs_chain_calls_total", "Contract calls issued through the gateway"),
        &["method", "outcome"]  // outcome: ok/error
    ).expect("metric creation failed");

    /// Successful candidate registrations per pool
    pub static ref POOL_REGISTRATIONS: CounterVec = CounterVec::new(
        Opts::new("fs_pool_registrations_total", "Candidates registered during bootstrap"),
        &["pool"]  // pool: airlines/flights
    ).expect("metric creation failed");

    /// Pools that stopped on a failure
    pub static ref POOL_FAILURES: CounterVec = CounterVec::new(
        Opts::new("fs_pool_failures_total", "Registration pools that failed"),
        &["pool"]
    ).expect("metric creation failed");

    /// Convergence cache reads by key and outcome
    pub static ref CACHE_READS: CounterVec = CounterVec::new(
        Opts::new("fs_cache_reads_total", "Convergence cache reads"),
        &["key", "outcome"]  // outcome: hit/miss/error
    ).expect("metric creation failed");
}

static REGISTER: Once = Once::new();

/// Register all counters with the global registry. Idempotent.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let mut result = Ok(());
    REGISTER.call_once(|| {
        let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(CHAIN_CALLS.clone()),
            Box::new(POOL_REGISTRATIONS.clone()),
            Box::new(POOL_FAILURES.clone()),
            Box::new(CACHE_READS.clone()),
        ];
        for metric in metrics {
            if let Err(e) = REGISTRY.register(metric) {
                result = Err(TelemetryError::MetricsInit(e.to_string()));
                return;
            }
        }
    });
    result
}

/// Count one gateway call.
pub fn record_chain_call(method: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    CHAIN_CALLS.with_label_values(&[method, outcome]).inc();
}

/// Count one successful registration in `pool`.
pub fn record_pool_registration(pool: &str) {
    POOL_REGISTRATIONS.with_label_values(&[pool]).inc();
}

/// Count one failed pool.
pub fn record_pool_failure(pool: &str) {
    POOL_FAILURES.with_label_values(&[pool]).inc();
}

/// Count one cache read. `outcome` is `hit`, `miss` or `error`.
pub fn record_cache_read(key: &str, outcome: &str) {
    CACHE_READS.with_label_values(&[key, outcome]).inc();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
