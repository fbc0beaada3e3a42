//! # Domain Module
//!
//! Envelope, keys and errors for the Convergence Cache.

pub mod envelope;
pub mod errors;

pub use envelope::*;
pub use errors::*;
