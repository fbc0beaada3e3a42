//! # Domain Module
//!
//! Roles, seed dataset, candidates, records, pool phases and errors.

pub mod errors;
pub mod phase;
pub mod records;
pub mod roles;
pub mod seed;

pub use errors::*;
pub use phase::*;
pub use records::*;
pub use roles::*;
pub use seed::*;
