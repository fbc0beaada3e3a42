//! # Cache Envelope
//!
//! Every persisted value is wrapped as `{version, seed_digest, value}`.
//! A value is only usable as-is when both the schema version and the digest
//! of the seed inputs it was derived from match the running session.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Schema version written by this build.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Converged airline pool.
pub const REGISTERED_AIRLINES_KEY: &str = "registered-airlines";

/// Converged flight pool.
pub const FLIGHTS_KEY: &str = "flights";

/// Key of the in-flight progress record for a pool key.
pub fn progress_key(key: &str) -> String {
    format!("{}.progress", key)
}

/// SHA-256 of the canonical form of a pool's seed inputs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SeedDigest(pub [u8; 32]);

impl SeedDigest {
    /// Digest arbitrary bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        Self(out)
    }

    /// Digest the canonical JSON form of `value`.
    pub fn of_json<T: Serialize + ?Sized>(value: &T) -> Self {
        // Seed inputs are plain strings, numbers and addresses; they always serialize.
        Self::of_bytes(&serde_json::to_vec(value).unwrap_or_default())
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for SeedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SeedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedDigest({}..)", &self.to_hex()[..12])
    }
}

/// Persisted wrapper around a cached value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Schema version.
    pub version: u32,
    /// Hex digest of the seed the value was derived from.
    pub seed_digest: String,
    /// The cached value.
    pub value: Value,
}

impl CacheEnvelope {
    /// Wrap `value` for the current schema and `digest`.
    pub fn wrap(digest: &SeedDigest, value: Value) -> Self {
        Self {
            version: CACHE_SCHEMA_VERSION,
            seed_digest: digest.to_hex(),
            value,
        }
    }
}

/// Completed prefix of a pool that has not converged yet.
///
/// `cursor` is the index of the next candidate to process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolProgress<T> {
    /// Next candidate index.
    pub cursor: usize,
    /// Results of candidates `0..cursor`.
    pub completed: Vec<T>,
}

impl<T> PoolProgress<T> {
    /// Nothing done yet.
    pub fn start() -> Self {
        Self {
            cursor: 0,
            completed: Vec::new(),
        }
    }

    /// Record one more completed candidate.
    pub fn advance(&mut self, result: T) {
        self.completed.push(result);
        self.cursor += 1;
    }
}

impl<T> Default for PoolProgress<T> {
    fn default() -> Self {
        Self::start()
    }
}
