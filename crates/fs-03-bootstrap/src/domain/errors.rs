//! # Bootstrap Errors

use super::phase::Pool;
use fs_01_contract_gateway::{ChainCallError, ContractMethod};
use fs_02_convergence_cache::CacheWriteError;
use thiserror::Error;

/// Bootstrap pass errors.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A contract call failed; the pool stops at this candidate.
    #[error("{step} failed for {subject}: {source}")]
    Chain {
        /// Contract method that failed.
        step: ContractMethod,
        /// Airline address or flight code being processed.
        subject: String,
        /// Gateway error.
        #[source]
        source: ChainCallError,
    },

    /// The chain's account list could not be fetched.
    #[error("cannot list chain accounts: {0}")]
    Accounts(#[source] ChainCallError),

    /// Pool work was attempted before the App contract was authorized.
    #[error("{pool} pool started before the App contract was authorized")]
    OrderingViolation {
        /// Offending pool.
        pool: Pool,
    },

    /// Accounts cannot be partitioned into roles.
    #[error("invalid role layout: {0}")]
    Roles(#[from] RoleLayoutError),

    /// Seed dataset is unusable.
    #[error("invalid seed dataset: {0}")]
    Seed(#[from] SeedError),

    /// The converged result could not be persisted.
    #[error("cannot persist converged result: {0}")]
    CacheWrite(#[from] CacheWriteError),
}

impl BootstrapError {
    /// Wrap a gateway error for `step` on `subject`.
    pub fn chain(step: ContractMethod, subject: impl Into<String>, source: ChainCallError) -> Self {
        BootstrapError::Chain {
            step,
            subject: subject.into(),
            source,
        }
    }
}

/// Role partitioning errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleLayoutError {
    /// The chain exposes no accounts at all.
    #[error("need at least {needed} accounts, chain has {available}")]
    NotEnoughAccounts {
        /// Minimum account count.
        needed: usize,
        /// Accounts available.
        available: usize,
    },

    /// A slot lies beyond the account list.
    #[error("{role} slot {slot} is out of range ({available} accounts)")]
    OutOfRange {
        /// Role name.
        role: &'static str,
        /// Requested slot.
        slot: usize,
        /// Accounts available.
        available: usize,
    },

    /// Two exclusive roles claim the same slot.
    #[error("slot {slot} claimed by both {first} and {second}")]
    Overlap {
        /// Contested slot.
        slot: usize,
        /// Role already holding the slot.
        first: &'static str,
        /// Role that also claimed it.
        second: &'static str,
    },

    /// Flights can only be registered by the owner or an airline candidate.
    #[error("flight operator slot {slot} is neither the owner nor an airline")]
    OperatorNotAirline {
        /// Configured slot.
        slot: usize,
    },
}

/// Seed dataset errors.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Seed file could not be read.
    #[error("cannot read seed file {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Seed JSON does not match the expected shape.
    #[error("cannot parse seed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// A flight timestamp is not a recognised date string.
    #[error("flight {flight} has invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// Flight code.
        flight: String,
        /// Raw timestamp.
        value: String,
    },
}
