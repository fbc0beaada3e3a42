//! # Adapters Layer (Hexagonal Architecture)
//!
//! Concrete transports and a simulated contract deployment.

#[cfg(feature = "http")]
mod http_transport;
mod in_memory_chain;

#[cfg(feature = "http")]
pub use http_transport::HttpTransport;
pub use in_memory_chain::{
    simulated_account, InMemoryChain, InsurancePolicy, RecordedCall, MAX_PREMIUM_ETHER,
    MIN_AIRLINE_FUNDING_ETHER,
};
