//! # FS-04 Presentation Adapter
//!
//! Read-only derived state for the view layer, plus the user-initiated
//! insurance and flight-status flows.
//!
//! **Subsystem ID:** 04  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Observables
//!
//! | Value | Type | Notes |
//! |-------|------|-------|
//! | `airlines` | `Vec<AirlineRecord>` | grows per completed candidate |
//! | `flights` | `Vec<FlightRecord>` | grows per completed candidate |
//! | `passengers` | `Vec<Passenger>` | seed + account slice, no chain |
//! | `operational_status` | `bool` | polled once |
//! | loading flags | `bool` | true → false once per pool |
//! | phases | `PoolPhase` | `Failed` distinguishes errors from loading |
//!
//! ## Module Structure
//!
//! ```text
//! fs-04-presentation/
//! ├── domain/          # PresentationSnapshot, errors
//! ├── adapter.rs       # PresentationAdapter (BootstrapPublisher)
//! └── flows.rs         # InsuranceDesk
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod domain;
pub mod flows;

// Re-exports
pub use adapter::PresentationAdapter;
pub use domain::{PresentationError, PresentationSnapshot};
pub use flows::{InsuranceDesk, MAX_PREMIUM_ETHER};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
