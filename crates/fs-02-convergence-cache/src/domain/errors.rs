//! # Convergence Cache Errors

use thiserror::Error;

/// Errors from the underlying key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    Io {
        /// Underlying error text.
        message: String,
    },

    /// The backing file is held by another process.
    #[error("Cache already in use ({path})")]
    Locked {
        /// Lock file path.
        path: String,
    },
}

/// A persisted value could not be used.
///
/// Every variant means "treat as absent"; the distinction exists so callers
/// can log why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheReadError {
    /// The store could not be read.
    #[error("cache read failed for '{key}': {message}")]
    Io {
        /// Cache key.
        key: String,
        /// Underlying error text.
        message: String,
    },

    /// The payload is not a valid envelope or the value does not decode.
    #[error("malformed cache entry '{key}': {reason}")]
    Malformed {
        /// Cache key.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// Written by a different schema version.
    #[error("cache entry '{key}' has schema version {found}, expected {expected}")]
    VersionMismatch {
        /// Cache key.
        key: String,
        /// Version found in the envelope.
        found: u32,
        /// Version this build writes.
        expected: u32,
    },

    /// Written for a different seed dataset.
    #[error("cache entry '{key}' was written for a different seed dataset")]
    SeedMismatch {
        /// Cache key.
        key: String,
    },
}

/// A value could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheWriteError {
    /// The value could not be serialized.
    #[error("cannot serialize cache entry '{key}': {reason}")]
    Serialize {
        /// Cache key.
        key: String,
        /// Encoder message.
        reason: String,
    },

    /// The store rejected the write.
    #[error("cache write failed for '{key}': {source}")]
    Store {
        /// Cache key.
        key: String,
        /// Store error.
        #[source]
        source: KVStoreError,
    },
}

impl CacheReadError {
    /// Metric label for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheReadError::Io { .. } => "io",
            CacheReadError::Malformed { .. } => "malformed",
            CacheReadError::VersionMismatch { .. } => "version_mismatch",
            CacheReadError::SeedMismatch { .. } => "seed_mismatch",
        }
    }
}
