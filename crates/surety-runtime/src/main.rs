//! # FlightSurety Client
//!
//! ```text
//! surety [--config surety.toml] [--profile NAME] [--simulate] <COMMAND>
//!
//!   bootstrap [--json]
//!   buy-insurance --passenger <ADDR|NAME> --flight <CODE> --premium <ETHER>
//!   request-status --requester <ADDR|NAME> --flight <CODE>
//!   clear-cache
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use surety_runtime::{execute, Args};
use surety_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use tracing::error;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("initializing telemetry")?;

    let outcome = execute(&args).await;

    if args.dump_metrics || telemetry.dump_metrics {
        match encode_metrics() {
            Ok(text) => eprintln!("{text}"),
            Err(e) => error!("[runtime] Cannot encode metrics: {}", e),
        }
    }

    match outcome {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            error!("[runtime] {:#}", e);
            Err(e)
        }
    }
}
