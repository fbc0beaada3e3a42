//! # Flight Pool
//!
//! Per candidate, strictly in order: `registerFlight(timestamp, code)` from the
//! flight operator.

use super::pool::PoolDriver;
use crate::domain::{
    flight_candidates, flight_digest, operator_name, BootstrapError, FlightCandidate,
    FlightRecord, Pool, RoleAssignments, SeedDataset,
};
use crate::ports::BootstrapPublisher;
use async_trait::async_trait;
use fs_01_contract_gateway::{ContractGateway, ContractMethod};
use fs_02_convergence_cache::SeedDigest;
use tracing::info;

/// Driver for the flight pool.
pub struct FlightPool<'a, G: ContractGateway> {
    /// Gateway.
    pub gateway: &'a G,
    /// Seed dataset.
    pub seed: &'a SeedDataset,
    /// Role assignments.
    pub roles: &'a RoleAssignments,
}

#[async_trait]
impl<'a, G: ContractGateway> PoolDriver for FlightPool<'a, G> {
    type Candidate = FlightCandidate;
    type Record = FlightRecord;

    fn pool(&self) -> Pool {
        Pool::Flights
    }

    fn candidates(&self) -> Result<Vec<FlightCandidate>, BootstrapError> {
        Ok(flight_candidates(self.seed)?)
    }

    fn digest(&self) -> SeedDigest {
        flight_digest(self.seed, self.roles)
    }

    fn matches(&self, candidate: &FlightCandidate, record: &FlightRecord) -> bool {
        candidate.flight_code == record.flight
            && candidate.timestamp == record.timestamp
            && record.airline_address == self.roles.flight_operator().account
    }

    fn reuse(&self, _candidate: &FlightCandidate, record: FlightRecord) -> FlightRecord {
        FlightRecord {
            airline_name: operator_name(self.seed, self.roles),
            ..record
        }
    }

    fn describe(&self, candidate: &FlightCandidate) -> String {
        format!("{}@{}", candidate.flight_code, candidate.timestamp)
    }

    async fn complete(&self, candidate: &FlightCandidate) -> Result<FlightRecord, BootstrapError> {
        let operator = self.roles.flight_operator().account;
        info!(
            "[fs-03] Registering flight {} from {}",
            self.describe(candidate),
            operator.short()
        );

        self.gateway
            .register_flight(operator, candidate.timestamp, &candidate.flight_code)
            .await
            .map_err(|e| {
                BootstrapError::chain(
                    ContractMethod::RegisterFlight,
                    candidate.flight_code.clone(),
                    e,
                )
            })?;

        Ok(FlightRecord {
            flight: candidate.flight_code.clone(),
            timestamp: candidate.timestamp,
            airline_address: operator,
            airline_name: operator_name(self.seed, self.roles),
        })
    }

    fn publish(&self, publisher: &dyn BootstrapPublisher, records: &[FlightRecord]) {
        publisher.publish_flights(records);
    }
}
