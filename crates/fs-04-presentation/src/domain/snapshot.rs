//! # View Snapshot

use fs_03_bootstrap::{AirlineRecord, FlightRecord, Passenger, PoolPhase};
use serde::Serialize;

/// Point-in-time copy of every observable value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSnapshot {
    /// Active airlines.
    pub airlines: Vec<AirlineRecord>,
    /// Registered flights.
    pub flights: Vec<FlightRecord>,
    /// Passenger projection.
    pub passengers: Vec<Passenger>,
    /// App contract operational flag.
    pub operational_status: bool,
    /// Airline pool still loading.
    pub is_loading_airlines: bool,
    /// Flight pool still loading.
    pub is_loading_flights: bool,
    /// Airline pool phase.
    pub airline_phase: PoolPhase,
    /// Flight pool phase.
    pub flight_phase: PoolPhase,
}
