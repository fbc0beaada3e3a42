//! # Container
//!
//! Configuration and the wiring of one client session.

pub mod config;
pub mod session;

pub use config::{ConfigError, SuretyConfig, DEFAULT_PROFILE};
pub use session::{load_seed, open_cache, CacheMode, Session, SessionError};
