//! # Candidates and Records
//!
//! Candidates are built from the seed dataset and the role assignments;
//! records are what gets published and cached once a candidate completes.

use super::errors::SeedError;
use super::roles::RoleAssignments;
use super::seed::{parse_timestamp, SeedDataset};
use fs_01_contract_gateway::Address;
use fs_02_convergence_cache::SeedDigest;
use serde::{Deserialize, Serialize};

/// Airline slated for registration and funding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirlineCandidate {
    /// Airline account.
    pub address: Address,
    /// Seed name.
    pub name: String,
}

/// Flight slated for registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlightCandidate {
    /// Flight code.
    pub flight_code: String,
    /// Departure, epoch milliseconds.
    pub timestamp: u64,
}

/// A registered and funded airline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineRecord {
    /// Airline account.
    pub address: Address,
    /// Name.
    pub name: String,
}

/// A registered flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    /// Flight code.
    pub flight: String,
    /// Departure, epoch milliseconds.
    pub timestamp: u64,
    /// Operating airline account.
    pub airline_address: Address,
    /// Operating airline name, when known.
    pub airline_name: Option<String>,
}

/// Read-only passenger projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Seed name.
    pub name: String,
    /// Passenger account.
    pub address: Address,
}

impl AirlineCandidate {
    /// The record published once this candidate is active.
    pub fn to_record(&self) -> AirlineRecord {
        AirlineRecord {
            address: self.address,
            name: self.name.clone(),
        }
    }
}

/// Zip seed airline names with the airline slice.
///
/// The owner slot is never a candidate; it is already registered.
pub fn airline_candidates(seed: &SeedDataset, roles: &RoleAssignments) -> Vec<AirlineCandidate> {
    seed.airlines
        .iter()
        .zip(roles.airlines())
        .map(|(name, address)| AirlineCandidate {
            address,
            name: name.clone(),
        })
        .collect()
}

/// Parse seed flights in order.
pub fn flight_candidates(seed: &SeedDataset) -> Result<Vec<FlightCandidate>, SeedError> {
    seed.flights
        .iter()
        .map(|f| {
            Ok(FlightCandidate {
                flight_code: f.flight.clone(),
                timestamp: parse_timestamp(&f.flight, &f.timestamp)?,
            })
        })
        .collect()
}

/// Zip seed passenger names with the passenger slice.
pub fn passengers(seed: &SeedDataset, roles: &RoleAssignments) -> Vec<Passenger> {
    seed.passengers
        .iter()
        .zip(roles.passengers())
        .map(|(name, address)| Passenger {
            name: name.clone(),
            address,
        })
        .collect()
}

/// Display name of the flight operator.
pub fn operator_name(seed: &SeedDataset, roles: &RoleAssignments) -> Option<String> {
    match roles.operator_candidate_index() {
        Some(index) => seed.airlines.get(index).cloned(),
        None => seed.first_airline.clone(),
    }
}

/// Digest of everything airline records are derived from: candidate
/// accounts paired with their seed names.
pub fn airline_digest(seed: &SeedDataset, roles: &RoleAssignments) -> SeedDigest {
    let inputs: Vec<(Address, &str)> = seed
        .airlines
        .iter()
        .zip(roles.airlines())
        .map(|(name, address)| (address, name.as_str()))
        .collect();
    SeedDigest::of_json(&inputs)
}

/// Digest of everything flight records are derived from: seed flights and
/// the operating airline.
pub fn flight_digest(seed: &SeedDataset, roles: &RoleAssignments) -> SeedDigest {
    SeedDigest::of_json(&(
        &seed.flights,
        roles.flight_operator().account,
        operator_name(seed, roles),
    ))
}
