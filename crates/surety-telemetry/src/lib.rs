//! # Surety Telemetry
//!
//! Structured logging and Prometheus counters for the FlightSurety client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use surety_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `FS_JSON_LOGS` | `false` | JSON log lines |
//! | `FS_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `FS_DUMP_METRICS` | `false` | Print counters on exit |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, record_cache_read, record_chain_call, record_pool_failure,
    record_pool_registration, register_metrics,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Counter registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Bad filter directive or other configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register counters, then install the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
