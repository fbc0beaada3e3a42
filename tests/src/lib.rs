//! # FlightSurety Client Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs            # Seed, layout, ObservedChain
//! └── integration/           # Cross-subsystem flows
//!     ├── bootstrap_properties.rs
//!     ├── recovery.rs
//!     └── insurance_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fs-tests
//!
//! # By category
//! cargo test -p fs-tests integration::recovery::
//!
//! # Benchmarks
//! cargo bench -p fs-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
