//! # Convergence Cache Service
//!
//! Typed access to persisted bootstrap results. Each key is bound to the
//! digest of the inputs its value was derived from.

use crate::adapters::InMemoryKVStore;
use crate::domain::{
    progress_key, CacheEnvelope, CacheReadError, CacheWriteError, PoolProgress, SeedDigest,
    CACHE_SCHEMA_VERSION,
};
use crate::ports::{BatchOperation, KeyValueStore};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use surety_telemetry::record_cache_read;
use tracing::debug;

/// Versioned cache shared by both registration pools.
///
/// All store access is serialized.
pub struct ConvergenceCache {
    store: Mutex<Box<dyn KeyValueStore>>,
}

impl ConvergenceCache {
    /// Wrap a storage backend.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
        }
    }

    /// Non-persistent cache.
    pub fn in_memory() -> Self {
        Self::new(InMemoryKVStore::new())
    }

    /// Load the value under `key` if it was derived from `digest`.
    ///
    /// `Ok(None)` means never written; every `Err` means written but unusable
    /// for these inputs.
    pub fn load<T: DeserializeOwned>(
        &self,
        key: &str,
        digest: &SeedDigest,
    ) -> Result<Option<T>, CacheReadError> {
        let result = self.load_inner(key, Some(digest));
        let outcome = match &result {
            Ok(Some(_)) => "hit",
            Ok(None) => "miss",
            Err(_) => "error",
        };
        record_cache_read(key, outcome);
        result
    }

    /// Load the value under `key` whatever inputs it was derived from.
    ///
    /// The schema version still has to match.
    pub fn load_any_seed<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheReadError> {
        self.load_inner(key, None)
    }

    fn load_inner<T: DeserializeOwned>(
        &self,
        key: &str,
        digest: Option<&SeedDigest>,
    ) -> Result<Option<T>, CacheReadError> {
        let raw = self
            .store
            .lock()
            .get(key)
            .map_err(|e| CacheReadError::Io {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let envelope: CacheEnvelope =
            serde_json::from_str(&raw).map_err(|e| CacheReadError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if envelope.version != CACHE_SCHEMA_VERSION {
            return Err(CacheReadError::VersionMismatch {
                key: key.to_string(),
                found: envelope.version,
                expected: CACHE_SCHEMA_VERSION,
            });
        }
        if let Some(digest) = digest {
            if envelope.seed_digest != digest.to_hex() {
                return Err(CacheReadError::SeedMismatch {
                    key: key.to_string(),
                });
            }
        }

        serde_json::from_value(envelope.value)
            .map(Some)
            .map_err(|e| CacheReadError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Persist `value` under `key`, bound to `digest`.
    pub fn store<T: Serialize>(
        &self,
        key: &str,
        digest: &SeedDigest,
        value: &T,
    ) -> Result<(), CacheWriteError> {
        let raw = encode(key, digest, value)?;
        self.store
            .lock()
            .put(key, &raw)
            .map_err(|source| CacheWriteError::Store {
                key: key.to_string(),
                source,
            })?;
        debug!("[fs-02] Stored '{}'", key);
        Ok(())
    }

    /// Delete `key`.
    pub fn remove(&self, key: &str) -> Result<(), CacheWriteError> {
        self.store
            .lock()
            .delete(key)
            .map_err(|source| CacheWriteError::Store {
                key: key.to_string(),
                source,
            })
    }

    /// Delete every key.
    pub fn clear(&self) -> Result<usize, CacheWriteError> {
        let mut store = self.store.lock();
        let keys = store.keys().map_err(|source| CacheWriteError::Store {
            key: "*".to_string(),
            source,
        })?;
        let count = keys.len();
        store
            .atomic_batch_write(keys.into_iter().map(BatchOperation::delete).collect())
            .map_err(|source| CacheWriteError::Store {
                key: "*".to_string(),
                source,
            })?;
        Ok(count)
    }

    /// Keys currently present (valid or not).
    pub fn keys(&self) -> Vec<String> {
        self.store.lock().keys().unwrap_or_default()
    }

    /// Load the progress record of the pool stored under `key`.
    ///
    /// Progress is matched per candidate by the caller, so it is returned
    /// whatever inputs it was written for.
    pub fn load_progress<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<PoolProgress<T>>, CacheReadError> {
        self.load_any_seed(&progress_key(key))
    }

    /// Persist the progress record of the pool stored under `key`.
    pub fn store_progress<T: Serialize>(
        &self,
        key: &str,
        digest: &SeedDigest,
        progress: &PoolProgress<T>,
    ) -> Result<(), CacheWriteError> {
        self.store(&progress_key(key), digest, progress)
    }

    /// Write the converged value and drop the progress record in one batch.
    pub fn commit<T: Serialize>(
        &self,
        key: &str,
        digest: &SeedDigest,
        value: &T,
    ) -> Result<(), CacheWriteError> {
        let raw = encode(key, digest, value)?;
        self.store
            .lock()
            .atomic_batch_write(vec![
                BatchOperation::put(key, raw),
                BatchOperation::delete(progress_key(key)),
            ])
            .map_err(|source| CacheWriteError::Store {
                key: key.to_string(),
                source,
            })?;
        debug!("[fs-02] Committed converged '{}'", key);
        Ok(())
    }
}

fn encode<T: Serialize>(
    key: &str,
    digest: &SeedDigest,
    value: &T,
) -> Result<String, CacheWriteError> {
    let serialize_err = |e: serde_json::Error| CacheWriteError::Serialize {
        key: key.to_string(),
        reason: e.to_string(),
    };
    let value = serde_json::to_value(value).map_err(serialize_err)?;
    serde_json::to_string(&CacheEnvelope::wrap(digest, value)).map_err(serialize_err)
}
