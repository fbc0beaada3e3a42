use crate::adapters::memory::apply_batch;
use crate::domain::KVStoreError;
use crate::ports::{BatchOperation, KeyValueStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[cfg(feature = "locking")]
use crate::adapters::lock::CacheLock;

/// File-backed key-value store.
///
/// The whole store is one JSON object `{key: value}` rewritten atomically
/// (temp file + rename) on every mutation. An unreadable file is moved aside
/// to `<path>.corrupt` and the store starts empty.
pub struct FileBackedKVStore {
    data: BTreeMap<String, String>,
    path: PathBuf,
    #[cfg(feature = "locking")]
    _lock: CacheLock,
}

impl FileBackedKVStore {
    /// Open (or create on first write) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        #[cfg(feature = "locking")]
        let lock = CacheLock::acquire(&path)?;

        let data = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(data) => {
                    info!(
                        "[fs-02] Loaded {} cache keys from {}",
                        data.len(),
                        path.display()
                    );
                    data
                }
                Err(e) => {
                    let aside = path.with_extension("corrupt");
                    warn!(
                        "[fs-02] Cache file {} is unreadable ({}), moving it to {}",
                        path.display(),
                        e,
                        aside.display()
                    );
                    std::fs::rename(&path, &aside).map_err(|e| KVStoreError::Io {
                        message: e.to_string(),
                    })?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[fs-02] No existing cache file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(KVStoreError::Io {
                    message: e.to_string(),
                })
            }
        };

        Ok(Self {
            data,
            path,
            #[cfg(feature = "locking")]
            _lock: lock,
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_to_file(&self, data: &BTreeMap<String, String>) -> Result<(), KVStoreError> {
        use std::io::Write;

        let io = |e: std::io::Error| KVStoreError::Io {
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(data).map_err(|e| KVStoreError::Io {
            message: e.to_string(),
        })?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io)?;
        file.write_all(&bytes).map_err(io)?;
        file.sync_all().map_err(io)?;
        std::fs::rename(&temp_path, &self.path).map_err(io)?;

        Ok(())
    }

    /// Apply a mutation to a copy, persist it, then swap it in.
    fn mutate<F>(&mut self, f: F) -> Result<(), KVStoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut next = self.data.clone();
        f(&mut next);
        self.save_to_file(&next)?;
        self.data = next;
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &str) -> Result<Option<String>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), KVStoreError> {
        self.mutate(|data| {
            data.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&mut self, key: &str) -> Result<(), KVStoreError> {
        if !self.data.contains_key(key) {
            return Ok(());
        }
        self.mutate(|data| {
            data.remove(key);
        })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.mutate(|data| apply_batch(data, operations))
    }

    fn keys(&self) -> Result<Vec<String>, KVStoreError> {
        Ok(self.data.keys().cloned().collect())
    }
}
