//! # Ports Module
//!
//! Driven port for the storage backend.

pub mod outbound;

pub use outbound::*;
