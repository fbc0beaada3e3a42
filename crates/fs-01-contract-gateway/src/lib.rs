//! # FS-01 Contract Gateway
//!
//! Typed calls against the deployed FlightSurety App and Data contracts.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Every chain interaction of the dApp goes through [`ContractGateway`]:
//! - reads (`isOperational`, `isAuthorizedCaller`, `isAirline`) via `eth_call`
//! - writes (`authorizeContract`, `registerAirline`, `fundAirline`,
//!   `registerFlight`, `buyInsurance`, `fetchFlightStatus`) via
//!   `eth_sendTransaction`, completing only once the receipt is mined
//!
//! Gas limit and gas price are fixed per [`ConnectedSession`].
//!
//! ## Module Structure
//!
//! ```text
//! fs-01-contract-gateway/
//! ├── domain/          # Address, Wei, ContractMethod, ABI codec, errors
//! ├── ports/           # ContractGateway (inbound), RpcTransport (outbound)
//! ├── service.rs       # RpcContractGateway
//! └── adapters/        # HttpTransport, InMemoryChain
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
#[cfg(feature = "http")]
pub use adapters::HttpTransport;
pub use adapters::{simulated_account, InMemoryChain, InsurancePolicy, RecordedCall};
pub use domain::{
    ether, parse_ether, Address, AddressParseError, ChainCallError, ConnectedSession,
    ContractMethod, GasParams, TxHash, TxReceipt, Wei, U256, WEI_PER_ETHER,
};
pub use ports::{ContractGateway, RpcTransport, ScriptedTransport};
pub use service::{ReceiptPolling, RpcContractGateway};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
