//! # Shared Fixtures
//!
//! Seed data, layouts and an observing gateway used across the flows.

use async_trait::async_trait;
use fs_01_contract_gateway::{
    Address, ChainCallError, ConnectedSession, ContractGateway, ContractMethod, InMemoryChain,
    TxReceipt, Wei,
};
use fs_03_bootstrap::{Pool, SeedDataset};
use fs_04_presentation::PresentationAdapter;
use std::sync::{Arc, Mutex, OnceLock};
use surety_runtime::{CacheMode, Session, SuretyConfig};

/// Seed with two airlines, three flights and two passengers.
pub const SEED_JSON: &str = r#"{
    "firstAirline": "Udacity Air",
    "airlines": ["Delta", "United"],
    "flights": [
        {"flight": "ND1309", "timestamp": "2024-06-01T08:15:00Z"},
        {"flight": "UA0815", "timestamp": "2024-06-01 13:40"},
        {"flight": "AA2201", "timestamp": "2024-06-02"}
    ],
    "passengers": ["Alice", "Bob"]
}"#;

/// Accounts needed by [`config`]: owner, two airlines, two passengers.
pub const ACCOUNTS: usize = 5;

/// Parsed [`SEED_JSON`].
pub fn seed() -> SeedDataset {
    SeedDataset::from_json_str(SEED_JSON).unwrap()
}

/// Config with passengers packed right after the airline slots.
pub fn config() -> SuretyConfig {
    let mut config = SuretyConfig::default();
    config.roles.airline_offset = 1;
    config.roles.passenger_offset = 3;
    config
}

/// Open a session over `gateway` with the default fixtures.
pub async fn open<G: ContractGateway + 'static>(gateway: Arc<G>, cache: CacheMode) -> Session<G> {
    Session::open(gateway, &config(), seed(), cache)
        .await
        .unwrap()
}

/// What the view showed when a write went out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteObservation {
    /// Method sent.
    pub method: ContractMethod,
    /// Airlines published at that moment.
    pub airlines_visible: usize,
    /// Flights published at that moment.
    pub flights_visible: usize,
    /// Airline pool still loading.
    pub airlines_loading: bool,
    /// Flight pool still loading.
    pub flights_loading: bool,
}

/// Gateway that snapshots the attached view before every write.
pub struct ObservedChain {
    /// Simulated contracts underneath.
    pub inner: Arc<InMemoryChain>,
    view: OnceLock<Arc<PresentationAdapter>>,
    observations: Mutex<Vec<WriteObservation>>,
}

impl ObservedChain {
    /// Wrap a fresh simulation.
    pub fn new(account_count: usize) -> Self {
        Self {
            inner: Arc::new(InMemoryChain::new(account_count)),
            view: OnceLock::new(),
            observations: Mutex::new(Vec::new()),
        }
    }

    /// Start observing `view`.
    pub fn attach(&self, view: Arc<PresentationAdapter>) {
        let _ = self.view.set(view);
    }

    /// Observations so far.
    pub fn observations(&self) -> Vec<WriteObservation> {
        self.observations.lock().unwrap().clone()
    }

    fn observe(&self, method: ContractMethod) {
        if let Some(view) = self.view.get() {
            self.observations.lock().unwrap().push(WriteObservation {
                method,
                airlines_visible: view.airlines().len(),
                flights_visible: view.flights().len(),
                airlines_loading: view.is_loading(Pool::Airlines),
                flights_loading: view.is_loading(Pool::Flights),
            });
        }
    }
}

#[async_trait]
impl ContractGateway for ObservedChain {
    fn session(&self) -> &ConnectedSession {
        self.inner.session()
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainCallError> {
        self.inner.accounts().await
    }

    async fn is_operational(&self) -> Result<bool, ChainCallError> {
        self.inner.is_operational().await
    }

    async fn is_authorized_caller(&self, caller: Address) -> Result<bool, ChainCallError> {
        self.inner.is_authorized_caller(caller).await
    }

    async fn authorize_contract(
        &self,
        from: Address,
        caller: Address,
    ) -> Result<TxReceipt, ChainCallError> {
        self.observe(ContractMethod::AuthorizeContract);
        self.inner.authorize_contract(from, caller).await
    }

    async fn is_airline(&self, airline: Address) -> Result<bool, ChainCallError> {
        self.inner.is_airline(airline).await
    }

    async fn register_airline(
        &self,
        from: Address,
        airline: Address,
        name: &str,
    ) -> Result<TxReceipt, ChainCallError> {
        self.observe(ContractMethod::RegisterAirline);
        self.inner.register_airline(from, airline, name).await
    }

    async fn fund_airline(&self, from: Address, stake: Wei) -> Result<TxReceipt, ChainCallError> {
        self.observe(ContractMethod::FundAirline);
        self.inner.fund_airline(from, stake).await
    }

    async fn register_flight(
        &self,
        from: Address,
        timestamp: u64,
        code: &str,
    ) -> Result<TxReceipt, ChainCallError> {
        self.observe(ContractMethod::RegisterFlight);
        self.inner.register_flight(from, timestamp, code).await
    }

    async fn buy_insurance(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        premium: Wei,
    ) -> Result<TxReceipt, ChainCallError> {
        self.observe(ContractMethod::BuyInsurance);
        self.inner
            .buy_insurance(from, airline, flight, timestamp, premium)
            .await
    }

    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxReceipt, ChainCallError> {
        self.observe(ContractMethod::FetchFlightStatus);
        self.inner
            .fetch_flight_status(from, airline, flight, timestamp)
            .await
    }
}
