//! # Airline Pool
//!
//! Per candidate, strictly in order: `registerAirline` from the owner (skipped
//! when `isAirline` already reports it), then `fundAirline` from the
//! candidate's own account with the configured stake.

use super::pool::PoolDriver;
use crate::domain::{
    airline_candidates, airline_digest, AirlineCandidate, AirlineRecord, BootstrapError, Pool,
    RoleAssignments, SeedDataset,
};
use crate::ports::BootstrapPublisher;
use async_trait::async_trait;
use fs_01_contract_gateway::{ContractGateway, ContractMethod, Wei};
use fs_02_convergence_cache::SeedDigest;
use tracing::{info, warn};

/// Driver for the airline pool.
pub struct AirlinePool<'a, G: ContractGateway> {
    /// Gateway.
    pub gateway: &'a G,
    /// Seed dataset.
    pub seed: &'a SeedDataset,
    /// Role assignments.
    pub roles: &'a RoleAssignments,
    /// Funding stake per airline.
    pub stake: Wei,
}

#[async_trait]
impl<'a, G: ContractGateway> PoolDriver for AirlinePool<'a, G> {
    type Candidate = AirlineCandidate;
    type Record = AirlineRecord;

    fn pool(&self) -> Pool {
        Pool::Airlines
    }

    fn candidates(&self) -> Result<Vec<AirlineCandidate>, BootstrapError> {
        Ok(airline_candidates(self.seed, self.roles))
    }

    fn digest(&self) -> SeedDigest {
        airline_digest(self.seed, self.roles)
    }

    // An account is registered and funded at most once, whatever its name.
    fn matches(&self, candidate: &AirlineCandidate, record: &AirlineRecord) -> bool {
        candidate.address == record.address
    }

    fn reuse(&self, candidate: &AirlineCandidate, record: AirlineRecord) -> AirlineRecord {
        if record.name != candidate.name {
            warn!(
                "[fs-03] {} was registered on chain as '{}'; the rename is not sent",
                self.describe(candidate),
                record.name
            );
        }
        candidate.to_record()
    }

    fn describe(&self, candidate: &AirlineCandidate) -> String {
        format!("{} ({})", candidate.name, candidate.address.short())
    }

    async fn complete(
        &self,
        candidate: &AirlineCandidate,
    ) -> Result<AirlineRecord, BootstrapError> {
        let address = candidate.address;
        let subject = address.to_string();

        let registered = self
            .gateway
            .is_airline(address)
            .await
            .map_err(|e| BootstrapError::chain(ContractMethod::IsAirline, subject.clone(), e))?;

        if registered {
            info!(
                "[fs-03] {} already registered, funding only",
                self.describe(candidate)
            );
        } else {
            info!("[fs-03] Registering airline {}", self.describe(candidate));
            self.gateway
                .register_airline(self.roles.owner(), address, &candidate.name)
                .await
                .map_err(|e| {
                    BootstrapError::chain(ContractMethod::RegisterAirline, subject.clone(), e)
                })?;
        }

        self.gateway
            .fund_airline(address, self.stake)
            .await
            .map_err(|e| BootstrapError::chain(ContractMethod::FundAirline, subject, e))?;

        info!("[fs-03] Airline {} active", self.describe(candidate));
        Ok(candidate.to_record())
    }

    fn publish(&self, publisher: &dyn BootstrapPublisher, records: &[AirlineRecord]) {
        publisher.publish_airlines(records);
    }
}
