//! # FS-03 Bootstrap Orchestrator
//!
//! Turns a raw account list and a static seed dataset into a converged
//! on-chain state: registered and funded airlines, registered flights.
//!
//! **Subsystem ID:** 03  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Guarantees
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | Authorization first | pools return `OrderingViolation` until `ensure_authorized` succeeds |
//! | Register before fund | each airline candidate completes both calls before the next starts |
//! | Cache hit is free | a converged key short-circuits the pool with zero chain calls |
//! | Resumable | completed prefix persisted per candidate; retries start at the cursor |
//! | Visible failure | `PoolPhase::Failed` instead of a stuck loading flag |
//!
//! ## Module Structure
//!
//! ```text
//! fs-03-bootstrap/
//! ├── domain/          # Roles, SeedDataset, candidates, records, PoolPhase, errors
//! ├── algorithms/      # run_pool + AirlinePool / FlightPool drivers
//! ├── ports/           # BootstrapApi (inbound), BootstrapPublisher (outbound)
//! └── service.rs       # BootstrapOrchestrator
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    airline_candidates, flight_candidates, parse_timestamp, passengers, AirlineCandidate,
    AirlineRecord, BootstrapError, FlightCandidate, FlightRecord, Passenger, Pool, PoolPhase,
    Role, RoleAssignment, RoleAssignments, RoleLayout, RoleLayoutError, SeedDataset, SeedError,
    SeedFlight,
};
pub use ports::{
    BootstrapApi, BootstrapPublisher, BootstrapReport, PublishedEvent, RecordingPublisher,
};
pub use service::{
    assign_roles, BootstrapConfig, BootstrapOrchestrator, DEFAULT_AIRLINE_STAKE_ETHER,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
