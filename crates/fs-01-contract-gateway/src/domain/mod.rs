//! # Domain Module
//!
//! Core types for the Contract Gateway.

pub mod abi;
pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
