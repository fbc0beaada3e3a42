//! # FS-02 Convergence Cache
//!
//! Persisted key/value results of bootstrap passes.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `registered-airlines` | converged `[{address, name}]` |
//! | `flights` | converged `[{flight, timestamp, airlineAddress, airlineName}]` |
//! | `<key>.progress` | `{cursor, completed}` of a pool that has not converged |
//!
//! Once a converged key is present it is the sole source of truth for that
//! pool until the cache is cleared. Values are wrapped in a versioned envelope
//! bound to the digest of that pool's seed inputs. A schema change makes them
//! unusable; changed inputs make them read as a mismatch, while the value
//! stays loadable through `load_any_seed` so completed work can be reused.
//!
//! ## Module Structure
//!
//! ```text
//! fs-02-convergence-cache/
//! ├── domain/          # CacheEnvelope, PoolProgress, SeedDigest, errors
//! ├── ports/           # KeyValueStore
//! ├── adapters/        # InMemoryKVStore, FileBackedKVStore, CacheLock
//! └── service.rs       # ConvergenceCache
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{FileBackedKVStore, InMemoryKVStore};
pub use domain::{
    progress_key, CacheEnvelope, CacheReadError, CacheWriteError, KVStoreError, PoolProgress,
    SeedDigest, CACHE_SCHEMA_VERSION, FLIGHTS_KEY, REGISTERED_AIRLINES_KEY,
};
pub use ports::{BatchOperation, KeyValueStore};
pub use service::ConvergenceCache;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
