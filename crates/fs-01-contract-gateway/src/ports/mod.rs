//! # Ports Module
//!
//! Hexagonal architecture ports (inbound gateway API, outbound RPC transport).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
