//! # Outbound Ports
//!
//! Where the orchestrator publishes derived state.
//!
//! Production: `PresentationAdapter` (fs-04)
//! Testing: `RecordingPublisher` (below)

use crate::domain::{AirlineRecord, FlightRecord, Passenger, Pool, PoolPhase};
use parking_lot::Mutex;

/// Sink for state derived during a bootstrap session.
///
/// Lists are always published whole; each call replaces the previous value.
pub trait BootstrapPublisher: Send + Sync {
    /// Current airline list.
    fn publish_airlines(&self, airlines: &[AirlineRecord]);

    /// Current flight list.
    fn publish_flights(&self, flights: &[FlightRecord]);

    /// Passenger projection.
    fn publish_passengers(&self, passengers: &[Passenger]);

    /// Result of the one-shot `isOperational` poll.
    fn publish_operational_status(&self, operational: bool);

    /// Phase change of a pool.
    fn set_phase(&self, pool: Pool, phase: PoolPhase);
}

/// One publication, as observed by [`RecordingPublisher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishedEvent {
    /// `publish_airlines`
    Airlines(Vec<AirlineRecord>),
    /// `publish_flights`
    Flights(Vec<FlightRecord>),
    /// `publish_passengers`
    Passengers(Vec<Passenger>),
    /// `publish_operational_status`
    Operational(bool),
    /// `set_phase`
    Phase(Pool, PoolPhase),
}

/// Mock publisher that records every call.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<PublishedEvent>>,
}

impl RecordingPublisher {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in order.
    pub fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().clone()
    }

    /// Every airline list published, in order.
    pub fn airline_snapshots(&self) -> Vec<Vec<AirlineRecord>> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PublishedEvent::Airlines(list) => Some(list.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every flight list published, in order.
    pub fn flight_snapshots(&self) -> Vec<Vec<FlightRecord>> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PublishedEvent::Flights(list) => Some(list.clone()),
                _ => None,
            })
            .collect()
    }

    /// Phases of `pool`, in order.
    pub fn phases(&self, pool: Pool) -> Vec<PoolPhase> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                PublishedEvent::Phase(p, phase) if *p == pool => Some(phase.clone()),
                _ => None,
            })
            .collect()
    }

    /// Last phase of `pool`.
    pub fn last_phase(&self, pool: Pool) -> Option<PoolPhase> {
        self.phases(pool).pop()
    }

    /// Last published operational flag.
    pub fn operational(&self) -> Option<bool> {
        self.events.lock().iter().rev().find_map(|e| match e {
            PublishedEvent::Operational(flag) => Some(*flag),
            _ => None,
        })
    }
}

impl BootstrapPublisher for RecordingPublisher {
    fn publish_airlines(&self, airlines: &[AirlineRecord]) {
        self.events
            .lock()
            .push(PublishedEvent::Airlines(airlines.to_vec()));
    }

    fn publish_flights(&self, flights: &[FlightRecord]) {
        self.events
            .lock()
            .push(PublishedEvent::Flights(flights.to_vec()));
    }

    fn publish_passengers(&self, passengers: &[Passenger]) {
        self.events
            .lock()
            .push(PublishedEvent::Passengers(passengers.to_vec()));
    }

    fn publish_operational_status(&self, operational: bool) {
        self.events
            .lock()
            .push(PublishedEvent::Operational(operational));
    }

    fn set_phase(&self, pool: Pool, phase: PoolPhase) {
        self.events.lock().push(PublishedEvent::Phase(pool, phase));
    }
}
