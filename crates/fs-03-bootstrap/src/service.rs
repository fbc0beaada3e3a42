//! # Bootstrap Orchestrator Service
//!
//! Drives one bootstrap session:
//!
//! ```text
//! publish passengers (sync, no chain)
//! ├── poll isOperational once
//! └── ensure_authorized ──► airline pool ─┐
//!                       └─► flight pool  ─┴─ concurrent, each sequential
//! ```
//!
//! When flights are operated by an airline candidate, the flight pool waits
//! for the airline pool so the operator is funded first.

use crate::algorithms::pool::fail;
use crate::algorithms::{run_pool, AirlinePool, FlightPool};
use crate::domain::{
    passengers, AirlineRecord, BootstrapError, FlightRecord, Passenger, Pool, RoleAssignments,
    RoleLayout, SeedDataset,
};
use crate::ports::{BootstrapApi, BootstrapPublisher, BootstrapReport};
use async_trait::async_trait;
use fs_01_contract_gateway::{ether, ContractGateway, ContractMethod, Wei};
use fs_02_convergence_cache::ConvergenceCache;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Default airline funding stake, in ether.
pub const DEFAULT_AIRLINE_STAKE_ETHER: u64 = 10;

/// Orchestrator tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Value sent with each `fundAirline`.
    pub airline_stake: Wei,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            airline_stake: ether(DEFAULT_AIRLINE_STAKE_ETHER),
        }
    }
}

/// Fetch the chain's accounts and partition them per `layout`.
pub async fn assign_roles<G: ContractGateway>(
    gateway: &G,
    layout: &RoleLayout,
    seed: &SeedDataset,
) -> Result<RoleAssignments, BootstrapError> {
    let accounts = gateway.accounts().await.map_err(BootstrapError::Accounts)?;
    let roles = layout.assign(&accounts, seed.airlines.len(), seed.passengers.len())?;
    info!(
        "[fs-03] Roles assigned: owner {}, {} airlines, {} passengers, flight operator slot {}",
        roles.owner().short(),
        roles.airlines().len(),
        roles.passengers().len(),
        roles.flight_operator().slot
    );
    for assignment in roles.all() {
        debug!(
            "[fs-03]   slot {:>2} {:<14} {}",
            assignment.slot,
            assignment.role.name(),
            assignment.account
        );
    }
    Ok(roles)
}

/// The Bootstrap Orchestrator.
pub struct BootstrapOrchestrator<G: ContractGateway> {
    gateway: Arc<G>,
    cache: Arc<ConvergenceCache>,
    publisher: Arc<dyn BootstrapPublisher>,
    seed: SeedDataset,
    roles: RoleAssignments,
    config: BootstrapConfig,
    authorized: AtomicBool,
}

impl<G: ContractGateway> BootstrapOrchestrator<G> {
    /// Create an orchestrator for one session.
    pub fn new(
        gateway: Arc<G>,
        cache: Arc<ConvergenceCache>,
        publisher: Arc<dyn BootstrapPublisher>,
        seed: SeedDataset,
        roles: RoleAssignments,
    ) -> Self {
        Self {
            gateway,
            cache,
            publisher,
            seed,
            roles,
            config: BootstrapConfig::default(),
            authorized: AtomicBool::new(false),
        }
    }

    /// Override tunables.
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Role assignments of this session.
    pub fn roles(&self) -> &RoleAssignments {
        &self.roles
    }

    /// Seed dataset of this session.
    pub fn seed(&self) -> &SeedDataset {
        &self.seed
    }

    /// Whether the authorization step succeeded in this session.
    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::Acquire)
    }

    fn require_authorized(&self, pool: Pool) -> Result<(), BootstrapError> {
        if self.is_authorized() {
            return Ok(());
        }
        Err(fail(
            pool,
            self.publisher.as_ref(),
            BootstrapError::OrderingViolation { pool },
        ))
    }

    async fn run_pools(
        &self,
    ) -> (
        Result<Vec<AirlineRecord>, BootstrapError>,
        Result<Vec<FlightRecord>, BootstrapError>,
    ) {
        if self.roles.operator_is_candidate() {
            let airlines = self.bootstrap_airlines().await;
            let flights = self.bootstrap_flights().await;
            (airlines, flights)
        } else {
            tokio::join!(self.bootstrap_airlines(), self.bootstrap_flights())
        }
    }
}

#[async_trait]
impl<G: ContractGateway> BootstrapApi for BootstrapOrchestrator<G> {
    async fn run(&self) -> BootstrapReport {
        let passengers = self.publish_passengers();

        let session = async {
            let authorization = self.ensure_authorized().await;
            let (airlines, flights) = self.run_pools().await;
            (authorization, airlines, flights)
        };
        let (operational, (authorization, airlines, flights)) =
            tokio::join!(self.poll_operational_status(), session);

        let report = BootstrapReport {
            operational,
            authorization,
            airlines,
            flights,
            passengers,
        };
        if report.is_converged() {
            info!("[fs-03] Bootstrap converged");
        } else {
            warn!("[fs-03] Bootstrap finished with failures");
        }
        report
    }

    async fn ensure_authorized(&self) -> Result<(), BootstrapError> {
        let app = self.gateway.session().app_address;
        let subject = app.to_string();

        let authorized = self
            .gateway
            .is_authorized_caller(app)
            .await
            .map_err(|e| {
                BootstrapError::chain(ContractMethod::IsAuthorizedCaller, subject.clone(), e)
            });

        let result = match authorized {
            Ok(true) => {
                info!("[fs-03] App contract {} already authorized", app.short());
                Ok(())
            }
            Ok(false) => {
                info!("[fs-03] Authorizing App contract {}", app.short());
                self.gateway
                    .authorize_contract(self.roles.owner(), app)
                    .await
                    .map(|_| ())
                    .map_err(|e| {
                        BootstrapError::chain(ContractMethod::AuthorizeContract, subject, e)
                    })
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => self.authorized.store(true, Ordering::Release),
            Err(e) => error!("[fs-03] Authorization step failed: {}", e),
        }
        result
    }

    async fn bootstrap_airlines(&self) -> Result<Vec<AirlineRecord>, BootstrapError> {
        self.require_authorized(Pool::Airlines)?;
        let driver = AirlinePool {
            gateway: self.gateway.as_ref(),
            seed: &self.seed,
            roles: &self.roles,
            stake: self.config.airline_stake,
        };
        run_pool(&driver, &self.cache, self.publisher.as_ref()).await
    }

    async fn bootstrap_flights(&self) -> Result<Vec<FlightRecord>, BootstrapError> {
        self.require_authorized(Pool::Flights)?;
        let driver = FlightPool {
            gateway: self.gateway.as_ref(),
            seed: &self.seed,
            roles: &self.roles,
        };
        run_pool(&driver, &self.cache, self.publisher.as_ref()).await
    }

    async fn poll_operational_status(&self) -> bool {
        let operational = match self.gateway.is_operational().await {
            Ok(flag) => flag,
            Err(e) => {
                warn!("[fs-03] isOperational failed, reporting not operational: {}", e);
                false
            }
        };
        self.publisher.publish_operational_status(operational);
        operational
    }

    fn publish_passengers(&self) -> Vec<Passenger> {
        let list = passengers(&self.seed, &self.roles);
        self.publisher.publish_passengers(&list);
        list
    }
}
