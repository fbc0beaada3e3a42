//! # Adapters Layer (Hexagonal Architecture)
//!
//! Storage backends implementing `KeyValueStore`.

mod file;
#[cfg(feature = "locking")]
mod lock;
mod memory;

pub use file::FileBackedKVStore;
#[cfg(feature = "locking")]
pub use lock::CacheLock;
pub use memory::InMemoryKVStore;
