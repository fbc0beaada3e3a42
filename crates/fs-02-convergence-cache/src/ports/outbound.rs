//! # Outbound Ports
//!
//! Storage backend used by the Convergence Cache.
//!
//! Production: `FileBackedKVStore`
//! Testing: `InMemoryKVStore`

use crate::domain::KVStoreError;

/// Abstract string key-value store holding JSON text values.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &str, value: &str) -> Result<(), KVStoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put {
        /// Key.
        key: String,
        /// JSON text.
        value: String,
    },
    /// Delete a key.
    Delete {
        /// Key.
        key: String,
    },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<String>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}
