//! # Domain Module

pub mod errors;
pub mod snapshot;

pub use errors::*;
pub use snapshot::*;
