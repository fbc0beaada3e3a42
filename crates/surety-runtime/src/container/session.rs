//! # Session Wiring
//!
//! Builds one client session in dependency order:
//!
//! 1. Load and validate the seed dataset
//! 2. Open the convergence cache
//! 3. List accounts and assign roles
//! 4. Wire the orchestrator to the presentation adapter

use crate::container::config::SuretyConfig;
use fs_01_contract_gateway::{Address, ContractGateway, TxReceipt, Wei};
use fs_02_convergence_cache::{ConvergenceCache, FileBackedKVStore, KVStoreError};
use fs_03_bootstrap::{
    assign_roles, BootstrapApi, BootstrapError, BootstrapOrchestrator, BootstrapReport,
    RoleAssignments, SeedDataset, SeedError,
};
use fs_04_presentation::{InsuranceDesk, PresentationAdapter, PresentationError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Session construction errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Seed dataset unreadable or invalid.
    #[error("seed dataset: {0}")]
    Seed(#[from] SeedError),

    /// Cache store could not be opened.
    #[error("cache store: {0}")]
    Cache(#[from] KVStoreError),

    /// Account listing or role assignment failed.
    #[error("roles: {0}")]
    Roles(#[from] BootstrapError),

    /// An account reference matched nothing in the session.
    #[error("'{0}' is neither an address nor a known passenger")]
    UnknownAccount(String),
}

/// Where converged results persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheMode {
    /// JSON file, survives restarts.
    File(PathBuf),
    /// Process memory only.
    Memory,
}

/// Read and validate the seed dataset named by `config`.
pub fn load_seed(config: &SuretyConfig) -> Result<SeedDataset, SeedError> {
    let seed = SeedDataset::load(&config.bootstrap.seed_path)?;
    seed.validate()?;
    info!(
        "[runtime] Seed {}: {} airlines, {} flights, {} passengers",
        config.bootstrap.seed_path.display(),
        seed.airlines.len(),
        seed.flights.len(),
        seed.passengers.len()
    );
    Ok(seed)
}

/// Open the cache named by `mode`.
pub fn open_cache(mode: &CacheMode) -> Result<ConvergenceCache, KVStoreError> {
    match mode {
        CacheMode::File(path) => Ok(ConvergenceCache::new(FileBackedKVStore::open(path)?)),
        CacheMode::Memory => Ok(ConvergenceCache::in_memory()),
    }
}

/// One wired client session.
pub struct Session<G: ContractGateway + 'static> {
    gateway: Arc<G>,
    cache: Arc<ConvergenceCache>,
    view: Arc<PresentationAdapter>,
    orchestrator: BootstrapOrchestrator<G>,
}

impl<G: ContractGateway + 'static> Session<G> {
    /// Wire a session over `gateway`.
    pub async fn open(
        gateway: Arc<G>,
        config: &SuretyConfig,
        seed: SeedDataset,
        cache: CacheMode,
    ) -> Result<Self, SessionError> {
        let cache = Arc::new(open_cache(&cache)?);
        let roles = assign_roles(gateway.as_ref(), &config.role_layout(), &seed).await?;
        let view = Arc::new(PresentationAdapter::new());
        let orchestrator = BootstrapOrchestrator::new(
            gateway.clone(),
            cache.clone(),
            view.clone(),
            seed,
            roles,
        )
        .with_config(config.bootstrap_config());

        Ok(Self {
            gateway,
            cache,
            view,
            orchestrator,
        })
    }

    /// Run the full bootstrap pass.
    pub async fn bootstrap(&self) -> BootstrapReport {
        self.orchestrator.run().await
    }

    /// Published state.
    pub fn view(&self) -> &Arc<PresentationAdapter> {
        &self.view
    }

    /// The session's cache.
    pub fn cache(&self) -> &Arc<ConvergenceCache> {
        &self.cache
    }

    /// Role assignments.
    pub fn roles(&self) -> &RoleAssignments {
        self.orchestrator.roles()
    }

    /// Resolve an address literal or a passenger name.
    pub fn resolve_account(&self, reference: &str) -> Result<Address, SessionError> {
        if let Ok(address) = reference.parse::<Address>() {
            return Ok(address);
        }
        self.view
            .passengers()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(reference))
            .map(|p| p.address)
            .ok_or_else(|| SessionError::UnknownAccount(reference.to_string()))
    }

    fn desk(&self) -> InsuranceDesk<G> {
        InsuranceDesk::new(self.gateway.clone(), self.view.clone())
    }

    /// Buy insurance on a published flight.
    pub async fn buy_insurance(
        &self,
        passenger: Address,
        flight: &str,
        premium: Wei,
    ) -> Result<TxReceipt, PresentationError> {
        self.desk().buy_insurance(passenger, flight, premium).await
    }

    /// Request the status of a published flight.
    pub async fn request_flight_status(
        &self,
        requester: Address,
        flight: &str,
    ) -> Result<TxReceipt, PresentationError> {
        self.desk().request_flight_status(requester, flight).await
    }
}
