//! # Inbound Ports
//!
//! API exposed by the Bootstrap Orchestrator.

use crate::domain::{AirlineRecord, BootstrapError, FlightRecord, Passenger};
use async_trait::async_trait;

/// Outcome of a full bootstrap session.
#[derive(Debug)]
pub struct BootstrapReport {
    /// Result of the one-shot `isOperational` poll (false on error).
    pub operational: bool,
    /// Authorization step outcome.
    pub authorization: Result<(), BootstrapError>,
    /// Airline pool outcome.
    pub airlines: Result<Vec<AirlineRecord>, BootstrapError>,
    /// Flight pool outcome.
    pub flights: Result<Vec<FlightRecord>, BootstrapError>,
    /// Passenger projection.
    pub passengers: Vec<Passenger>,
}

impl BootstrapReport {
    /// Every step succeeded.
    pub fn is_converged(&self) -> bool {
        self.authorization.is_ok() && self.airlines.is_ok() && self.flights.is_ok()
    }
}

/// Primary API for driving a bootstrap session.
#[async_trait]
pub trait BootstrapApi: Send + Sync {
    /// Run everything: passengers, operational poll, authorization, both pools.
    async fn run(&self) -> BootstrapReport;

    /// Authorize the App contract on the Data contract if it is not yet.
    async fn ensure_authorized(&self) -> Result<(), BootstrapError>;

    /// Drive the airline pool. Requires `ensure_authorized` first.
    async fn bootstrap_airlines(&self) -> Result<Vec<AirlineRecord>, BootstrapError>;

    /// Drive the flight pool. Requires `ensure_authorized` first.
    async fn bootstrap_flights(&self) -> Result<Vec<FlightRecord>, BootstrapError>;

    /// Poll `isOperational` once and publish it; errors publish `false`.
    async fn poll_operational_status(&self) -> bool;

    /// Build and publish the passenger projection. Never touches the chain.
    fn publish_passengers(&self) -> Vec<Passenger>;
}
