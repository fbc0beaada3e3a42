//! # Resumable Registration Pool
//!
//! Shared state machine of the airline and flight pools:
//!
//! 1. converged key present for the current inputs → publish it, `Converged`,
//!    no chain calls
//! 2. otherwise build candidates; records left by earlier runs (the progress
//!    record, or a converged list written for different inputs) count as
//!    completed for every candidate they still match
//! 3. complete the remaining candidates strictly in order; after each one
//!    persist the progress record and publish the grown list
//! 4. first failure → `Failed`, partial list stays published, nothing converged
//! 5. all done → commit the converged key, drop the progress record, `Converged`

use crate::domain::{BootstrapError, Pool, PoolPhase};
use crate::ports::BootstrapPublisher;
use async_trait::async_trait;
use fs_02_convergence_cache::{CacheReadError, ConvergenceCache, PoolProgress, SeedDigest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use surety_telemetry::{record_pool_failure, record_pool_registration};
use tracing::{debug, error, info, warn};

/// One pool's candidate handling.
#[async_trait]
pub trait PoolDriver: Send + Sync {
    /// Seed-derived work item.
    type Candidate: Send + Sync;
    /// Published and cached result of a completed candidate.
    type Record: Clone + Serialize + DeserializeOwned + Send + Sync;

    /// Which pool this is.
    fn pool(&self) -> Pool;

    /// Digest of the seed inputs this pool's records derive from.
    fn digest(&self) -> SeedDigest;

    /// Build the candidate list. Only called on a cache miss.
    fn candidates(&self) -> Result<Vec<Self::Candidate>, BootstrapError>;

    /// Whether a persisted record proves `candidate` is already done on chain.
    fn matches(&self, candidate: &Self::Candidate, record: &Self::Record) -> bool;

    /// Record to publish for a candidate completed by an earlier run.
    fn reuse(&self, _candidate: &Self::Candidate, record: Self::Record) -> Self::Record {
        record
    }

    /// Log label for a candidate.
    fn describe(&self, candidate: &Self::Candidate) -> String;

    /// Drive one candidate to completion on chain.
    async fn complete(&self, candidate: &Self::Candidate) -> Result<Self::Record, BootstrapError>;

    /// Publish the current list.
    fn publish(&self, publisher: &dyn BootstrapPublisher, records: &[Self::Record]);
}

/// Run `driver` to convergence or to its first failure.
pub async fn run_pool<D: PoolDriver>(
    driver: &D,
    cache: &ConvergenceCache,
    publisher: &dyn BootstrapPublisher,
) -> Result<Vec<D::Record>, BootstrapError> {
    let pool = driver.pool();
    let key = pool.cache_key();
    let digest = driver.digest();
    publisher.set_phase(pool, PoolPhase::Loading);

    let mut known = match cache.load::<Vec<D::Record>>(key, &digest) {
        Ok(Some(records)) => {
            info!(
                "[fs-03] {} pool converged in cache ({} entries), skipping chain work",
                pool,
                records.len()
            );
            driver.publish(publisher, &records);
            publisher.set_phase(pool, PoolPhase::Converged);
            return Ok(records);
        }
        Ok(None) => Vec::new(),
        Err(CacheReadError::SeedMismatch { .. }) => stale_records::<D>(cache, key),
        Err(e) => {
            warn!("[fs-03] Ignoring unusable cache entry: {}", e);
            Vec::new()
        }
    };

    let candidates = match driver.candidates() {
        Ok(candidates) => candidates,
        Err(e) => return Err(fail(pool, publisher, e)),
    };
    known.extend(previous_progress::<D>(cache, key));

    let mut progress = PoolProgress::start();
    let mut reused = 0;
    for candidate in &candidates {
        if let Some(idx) = known.iter().position(|r| driver.matches(candidate, r)) {
            debug!(
                "[fs-03] {} already completed by an earlier run",
                driver.describe(candidate)
            );
            progress.advance(driver.reuse(candidate, known.swap_remove(idx)));
            reused += 1;
            driver.publish(publisher, &progress.completed);
            continue;
        }

        publisher.set_phase(
            pool,
            PoolPhase::Registering {
                cursor: progress.cursor,
            },
        );

        let record = match driver.complete(candidate).await {
            Ok(record) => record,
            Err(e) => {
                error!(
                    "[fs-03] {} pool stopped at {} ({}/{}): {}",
                    pool,
                    driver.describe(candidate),
                    progress.cursor,
                    candidates.len(),
                    e
                );
                return Err(fail(pool, publisher, e));
            }
        };

        progress.advance(record);
        record_pool_registration(pool.name());
        if let Err(e) = cache.store_progress(key, &digest, &progress) {
            warn!("[fs-03] Progress not persisted, a retry will redo it: {}", e);
        }
        driver.publish(publisher, &progress.completed);
    }

    if let Err(e) = cache.commit(key, &digest, &progress.completed) {
        return Err(fail(pool, publisher, e.into()));
    }

    info!(
        "[fs-03] {} pool converged ({} entries, {} from earlier runs)",
        pool,
        progress.completed.len(),
        reused
    );
    driver.publish(publisher, &progress.completed);
    publisher.set_phase(pool, PoolPhase::Converged);
    Ok(progress.completed)
}

/// Converged records written for different seed inputs.
fn stale_records<D: PoolDriver>(cache: &ConvergenceCache, key: &str) -> Vec<D::Record> {
    match cache.load_any_seed::<Vec<D::Record>>(key) {
        Ok(Some(records)) => {
            info!(
                "[fs-03] Inputs of '{}' changed, matching {} cached entries against candidates",
                key,
                records.len()
            );
            records
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("[fs-03] Ignoring unusable cache entry: {}", e);
            Vec::new()
        }
    }
}

/// Records completed by a run that did not converge.
fn previous_progress<D: PoolDriver>(cache: &ConvergenceCache, key: &str) -> Vec<D::Record> {
    match cache.load_progress::<D::Record>(key) {
        Ok(Some(progress)) => {
            info!(
                "[fs-03] Found progress record for '{}' (cursor {})",
                key, progress.cursor
            );
            progress.completed
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("[fs-03] Ignoring unusable progress record: {}", e);
            Vec::new()
        }
    }
}

pub(crate) fn fail(
    pool: Pool,
    publisher: &dyn BootstrapPublisher,
    err: BootstrapError,
) -> BootstrapError {
    record_pool_failure(pool.name());
    publisher.set_phase(
        pool,
        PoolPhase::Failed {
            reason: err.to_string(),
        },
    );
    err
}
