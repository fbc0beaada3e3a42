//! # Surety Runtime Library
//!
//! Configuration, session wiring and the command line of the FlightSurety
//! client. The entry point is the `surety` binary in `main.rs`.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (`FS_LOG_LEVEL`, `FS_JSON_LOGS`)
//! 2. Load `surety.toml`, apply `FS_*` overrides, validate
//! 3. Load the seed dataset
//! 4. Connect the gateway (JSON-RPC, or the simulated contracts)
//! 5. Assign roles, open the cache, bootstrap
//! 6. Run the requested action against the published state
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and session wiring
//! - `cli` - Arguments and command execution

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod container;

pub use cli::{execute, resolve_config, Args, Command};
pub use container::{CacheMode, ConfigError, Session, SessionError, SuretyConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
