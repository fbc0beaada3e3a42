//! # Algorithms
//!
//! The resumable pool state machine and its two drivers.

pub mod airlines;
pub mod flights;
pub mod pool;

pub use airlines::AirlinePool;
pub use flights::FlightPool;
pub use pool::{run_pool, PoolDriver};
