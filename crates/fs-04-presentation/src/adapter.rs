//! # Presentation Adapter
//!
//! Observable, read-only view of a bootstrap session backed by
//! `tokio::sync::watch` channels. Implements `BootstrapPublisher`.
//!
//! Loading flags start `true` and clear exactly once per pool: on the first
//! non-empty list or when the pool reaches a terminal phase. Nothing sets them
//! back.

use crate::domain::PresentationSnapshot;
use fs_03_bootstrap::{
    AirlineRecord, BootstrapPublisher, FlightRecord, Passenger, Pool, PoolPhase,
};
use tokio::sync::watch;
use tracing::debug;

/// Channels for one pool.
struct PoolChannels<T> {
    list: watch::Sender<Vec<T>>,
    loading: watch::Sender<bool>,
    phase: watch::Sender<PoolPhase>,
}

impl<T> PoolChannels<T> {
    fn new() -> Self {
        Self {
            list: watch::Sender::new(Vec::new()),
            loading: watch::Sender::new(true),
            phase: watch::Sender::new(PoolPhase::Loading),
        }
    }

    /// Monotonic true → false.
    fn clear_loading(&self) -> bool {
        self.loading.send_if_modified(|loading| {
            let was = *loading;
            *loading = false;
            was
        })
    }

    fn publish(&self, items: Vec<T>) {
        let non_empty = !items.is_empty();
        self.list.send_replace(items);
        if non_empty {
            self.clear_loading();
        }
    }

    fn set_phase(&self, phase: PoolPhase) {
        let terminal = phase.is_terminal();
        self.phase.send_replace(phase);
        if terminal {
            self.clear_loading();
        }
    }
}

/// View model of a session.
pub struct PresentationAdapter {
    airlines: PoolChannels<AirlineRecord>,
    flights: PoolChannels<FlightRecord>,
    passengers: watch::Sender<Vec<Passenger>>,
    operational: watch::Sender<bool>,
}

impl Default for PresentationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationAdapter {
    /// Fresh view: empty lists, both pools loading, not operational.
    pub fn new() -> Self {
        Self {
            airlines: PoolChannels::new(),
            flights: PoolChannels::new(),
            passengers: watch::Sender::new(Vec::new()),
            operational: watch::Sender::new(false),
        }
    }

    /// Current airline list.
    pub fn airlines(&self) -> Vec<AirlineRecord> {
        self.airlines.list.borrow().clone()
    }

    /// Current flight list.
    pub fn flights(&self) -> Vec<FlightRecord> {
        self.flights.list.borrow().clone()
    }

    /// Passenger projection.
    pub fn passengers(&self) -> Vec<Passenger> {
        self.passengers.borrow().clone()
    }

    /// App contract operational flag.
    pub fn operational_status(&self) -> bool {
        *self.operational.borrow()
    }

    /// Loading flag of `pool`.
    pub fn is_loading(&self, pool: Pool) -> bool {
        match pool {
            Pool::Airlines => *self.airlines.loading.borrow(),
            Pool::Flights => *self.flights.loading.borrow(),
        }
    }

    /// Phase of `pool`.
    pub fn phase(&self, pool: Pool) -> PoolPhase {
        match pool {
            Pool::Airlines => self.airlines.phase.borrow().clone(),
            Pool::Flights => self.flights.phase.borrow().clone(),
        }
    }

    /// Subscribe to airline list changes.
    pub fn subscribe_airlines(&self) -> watch::Receiver<Vec<AirlineRecord>> {
        self.airlines.list.subscribe()
    }

    /// Subscribe to flight list changes.
    pub fn subscribe_flights(&self) -> watch::Receiver<Vec<FlightRecord>> {
        self.flights.list.subscribe()
    }

    /// Subscribe to the passenger projection.
    pub fn subscribe_passengers(&self) -> watch::Receiver<Vec<Passenger>> {
        self.passengers.subscribe()
    }

    /// Subscribe to the operational flag.
    pub fn subscribe_operational_status(&self) -> watch::Receiver<bool> {
        self.operational.subscribe()
    }

    /// Subscribe to the loading flag of `pool`.
    pub fn subscribe_loading(&self, pool: Pool) -> watch::Receiver<bool> {
        match pool {
            Pool::Airlines => self.airlines.loading.subscribe(),
            Pool::Flights => self.flights.loading.subscribe(),
        }
    }

    /// Subscribe to the phase of `pool`.
    pub fn subscribe_phase(&self, pool: Pool) -> watch::Receiver<PoolPhase> {
        match pool {
            Pool::Airlines => self.airlines.phase.subscribe(),
            Pool::Flights => self.flights.phase.subscribe(),
        }
    }

    /// Copy of every value.
    pub fn snapshot(&self) -> PresentationSnapshot {
        PresentationSnapshot {
            airlines: self.airlines(),
            flights: self.flights(),
            passengers: self.passengers(),
            operational_status: self.operational_status(),
            is_loading_airlines: self.is_loading(Pool::Airlines),
            is_loading_flights: self.is_loading(Pool::Flights),
            airline_phase: self.phase(Pool::Airlines),
            flight_phase: self.phase(Pool::Flights),
        }
    }
}

impl BootstrapPublisher for PresentationAdapter {
    fn publish_airlines(&self, airlines: &[AirlineRecord]) {
        self.airlines.publish(airlines.to_vec());
    }

    fn publish_flights(&self, flights: &[FlightRecord]) {
        self.flights.publish(flights.to_vec());
    }

    fn publish_passengers(&self, passengers: &[Passenger]) {
        self.passengers.send_replace(passengers.to_vec());
    }

    fn publish_operational_status(&self, operational: bool) {
        self.operational.send_replace(operational);
    }

    fn set_phase(&self, pool: Pool, phase: PoolPhase) {
        debug!("[fs-04] {} pool -> {:?}", pool, phase);
        match pool {
            Pool::Airlines => self.airlines.set_phase(phase),
            Pool::Flights => self.flights.set_phase(phase),
        }
    }
}
