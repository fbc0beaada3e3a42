//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to print the Prometheus text dump on shutdown
    pub dump_metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "flight-surety".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            dump_metrics: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FS_SERVICE_NAME`: Service name (default: flight-surety)
    /// - `FS_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `FS_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `FS_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `FS_DUMP_METRICS`: Print counters on exit (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("FS_SERVICE_NAME")
                .unwrap_or_else(|_| "flight-surety".to_string()),

            log_level: env::var("FS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("FS_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),

            json_logs: env::var("FS_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(false),

            dump_metrics: env::var("FS_DUMP_METRICS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(false),
        }
    }

    /// Override the log level (e.g. from a `--verbose` flag).
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// `true`/`1`/`yes` are on, `false`/`0`/`no` are off, anything else is `default`.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}
