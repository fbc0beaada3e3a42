//! # Cache File Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows)
//! so two sessions never interleave writes to the same cache file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::KVStoreError;

/// Exclusive lock next to a cache file, released on drop.
pub struct CacheLock {
    file: File,
    path: PathBuf,
}

impl CacheLock {
    /// Lock `<cache_path>.lock` without blocking.
    ///
    /// # Errors
    ///
    /// `KVStoreError::Locked` if another process holds it.
    pub fn acquire(cache_path: &Path) -> Result<Self, KVStoreError> {
        let path = lock_path(cache_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| KVStoreError::Io {
                    message: e.to_string(),
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| KVStoreError::Io {
                message: e.to_string(),
            })?;

        file.try_lock_exclusive()
            .map_err(|_| KVStoreError::Locked {
                path: path.display().to_string(),
            })?;

        // Informational only
        let _ = file.set_len(0);
        let _ = writeln!(file, "{}", std::process::id());

        Ok(Self { file, path })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn lock_path(cache_path: &Path) -> PathBuf {
    let mut name = cache_path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}
