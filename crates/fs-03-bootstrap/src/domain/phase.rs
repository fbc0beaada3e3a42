//! # Pool Phases

use fs_02_convergence_cache::{FLIGHTS_KEY, REGISTERED_AIRLINES_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent registration pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    /// Airline registration + funding.
    Airlines,
    /// Flight registration.
    Flights,
}

impl Pool {
    /// Metric/log label.
    pub fn name(&self) -> &'static str {
        match self {
            Pool::Airlines => "airlines",
            Pool::Flights => "flights",
        }
    }

    /// Cache key of the converged result.
    pub fn cache_key(&self) -> &'static str {
        match self {
            Pool::Airlines => REGISTERED_AIRLINES_KEY,
            Pool::Flights => FLIGHTS_KEY,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observable state of one pool.
///
/// ```text
/// Loading ──► Registering{cursor} ──► Converged
///    │               │
///    └───────────────┴──────────────► Failed{reason}
/// Loading ──► Converged                (cache hit)
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PoolPhase {
    /// Not started, or reading the cache.
    #[default]
    Loading,
    /// Working on candidate `cursor`.
    Registering {
        /// Index of the candidate in progress.
        cursor: usize,
    },
    /// Every candidate completed and the result is cached.
    Converged,
    /// The pool stopped on an error; partial results stay published.
    Failed {
        /// Error text.
        reason: String,
    },
}

impl PoolPhase {
    /// `Converged` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PoolPhase::Converged | PoolPhase::Failed { .. })
    }
}

impl fmt::Display for PoolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolPhase::Loading => f.write_str("loading"),
            PoolPhase::Registering { cursor } => write!(f, "registering #{cursor}"),
            PoolPhase::Converged => f.write_str("converged"),
            PoolPhase::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}
