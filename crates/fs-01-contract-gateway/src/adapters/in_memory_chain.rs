//! In-Memory Chain Adapter
//!
//! Implements `ContractGateway` against a simulated pair of FlightSurety
//! contracts. Used by tests and by the runtime's `--simulate` mode.
//!
//! Simulated contract rules:
//! - the owner (account 0) is the pre-registered, funded first airline
//! - `authorizeContract` only from the owner
//! - `registerAirline` / `registerFlight` revert until the App contract is authorized
//! - `registerAirline` only from a funded airline, once per airline
//! - `fundAirline` only from a registered airline, at least [`MIN_AIRLINE_FUNDING_ETHER`]
//! - `buyInsurance` premium in `(0, 1 ether]` for a registered flight

use crate::domain::{
    ether, Address, ChainCallError, ConnectedSession, ContractMethod, TxHash, TxReceipt, Wei,
};
use crate::ports::ContractGateway;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Minimum airline stake accepted by the simulated App contract.
pub const MIN_AIRLINE_FUNDING_ETHER: u64 = 10;

/// Maximum insurance premium accepted by the simulated App contract.
pub const MAX_PREMIUM_ETHER: u64 = 1;

/// One observed gateway call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    /// Method invoked.
    pub method: ContractMethod,
    /// Sender for writes.
    pub from: Option<Address>,
    /// Main argument (airline address or flight code), if any.
    pub subject: Option<String>,
}

/// A purchased policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsurancePolicy {
    /// Insured passenger.
    pub passenger: Address,
    /// Operating airline.
    pub airline: Address,
    /// Flight code.
    pub flight: String,
    /// Flight timestamp.
    pub timestamp: u64,
    /// Premium paid.
    pub premium: Wei,
}

#[derive(Clone, Debug)]
struct AirlineEntry {
    name: String,
    funded: bool,
}

#[derive(Clone, Debug)]
enum FailurePlan {
    Always,
    OnOccurrences(HashSet<usize>),
}

#[derive(Default)]
struct ChainState {
    operational: bool,
    authorized: HashSet<Address>,
    airlines: HashMap<Address, AirlineEntry>,
    flights: Vec<(Address, String, u64)>,
    policies: Vec<InsurancePolicy>,
    status_requests: Vec<(Address, String, u64)>,
    calls: Vec<RecordedCall>,
    counts: HashMap<ContractMethod, usize>,
    failures: HashMap<ContractMethod, FailurePlan>,
    tx_counter: u64,
}

impl ChainState {
    /// Record the call and apply any injected failure.
    fn enter(
        &mut self,
        method: ContractMethod,
        from: Option<Address>,
        subject: Option<String>,
    ) -> Result<(), ChainCallError> {
        self.calls.push(RecordedCall {
            method,
            from,
            subject,
        });
        let count = self.counts.entry(method).or_insert(0);
        *count += 1;
        let occurrence = *count;

        let injected = match self.failures.get(&method) {
            Some(FailurePlan::Always) => true,
            Some(FailurePlan::OnOccurrences(set)) => set.contains(&occurrence),
            None => false,
        };
        if injected {
            return Err(ChainCallError::Rpc {
                code: -32000,
                message: format!("injected failure on {} #{}", method, occurrence),
                data: None,
            });
        }
        Ok(())
    }

    fn mine(&mut self) -> TxReceipt {
        self.tx_counter += 1;
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&self.tx_counter.to_be_bytes());
        TxReceipt {
            tx_hash: TxHash(hash),
            block_number: Some(self.tx_counter),
            gas_used: Some(21_000),
        }
    }

    fn is_funded(&self, addr: &Address) -> bool {
        self.airlines.get(addr).map(|a| a.funded).unwrap_or(false)
    }
}

fn revert(method: ContractMethod, reason: &str) -> ChainCallError {
    ChainCallError::Reverted {
        method,
        reason: reason.to_string(),
        tx_hash: None,
    }
}

/// Simulated FlightSurety deployment.
pub struct InMemoryChain {
    session: ConnectedSession,
    accounts: Vec<Address>,
    state: Mutex<ChainState>,
}

impl InMemoryChain {
    /// Deploy a fresh simulation with `account_count` deterministic accounts.
    ///
    /// Account 0 is the contract owner and the first funded airline.
    pub fn new(account_count: usize) -> Self {
        let accounts: Vec<Address> = (0..account_count).map(simulated_account).collect();
        let session = ConnectedSession::new(
            "memory://flight-surety",
            Address::new([0xAA; 20]),
            Address::new([0xDD; 20]),
        );

        let mut state = ChainState {
            operational: true,
            ..Default::default()
        };
        if let Some(owner) = accounts.first() {
            state.airlines.insert(
                *owner,
                AirlineEntry {
                    name: "First Airline".to_string(),
                    funded: true,
                },
            );
        }

        Self {
            session,
            accounts,
            state: Mutex::new(state),
        }
    }

    /// The deterministic account list.
    pub fn account_list(&self) -> &[Address] {
        &self.accounts
    }

    /// Make every occurrence of `method` fail.
    pub fn fail_always(&self, method: ContractMethod) {
        self.state.lock().failures.insert(method, FailurePlan::Always);
    }

    /// Make the `occurrence`-th call (1-based) of `method` fail.
    pub fn fail_on(&self, method: ContractMethod, occurrence: usize) {
        let mut state = self.state.lock();
        match state
            .failures
            .entry(method)
            .or_insert_with(|| FailurePlan::OnOccurrences(HashSet::new()))
        {
            FailurePlan::OnOccurrences(set) => {
                set.insert(occurrence);
            }
            FailurePlan::Always => {}
        }
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Flip the App contract's operational flag.
    pub fn set_operational(&self, operational: bool) {
        self.state.lock().operational = operational;
    }

    /// Authorize the App contract out of band (as a previous session would have).
    pub fn preauthorize_app(&self) {
        let app = self.session.app_address;
        self.state.lock().authorized.insert(app);
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Calls of one method, in order.
    pub fn calls_of(&self, method: ContractMethod) -> Vec<RecordedCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Number of write calls observed.
    pub fn write_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| !c.method.is_read())
            .count()
    }

    /// Whether `addr` is registered and funded.
    pub fn is_active_airline(&self, addr: &Address) -> bool {
        self.state.lock().is_funded(addr)
    }

    /// Registered name of an airline.
    pub fn airline_name(&self, addr: &Address) -> Option<String> {
        self.state.lock().airlines.get(addr).map(|a| a.name.clone())
    }

    /// Registered flight codes, in registration order.
    pub fn flight_codes(&self) -> Vec<String> {
        self.state
            .lock()
            .flights
            .iter()
            .map(|(_, code, _)| code.clone())
            .collect()
    }

    /// Purchased policies.
    pub fn policies(&self) -> Vec<InsurancePolicy> {
        self.state.lock().policies.clone()
    }

    /// Number of flight-status requests emitted.
    pub fn status_request_count(&self) -> usize {
        self.state.lock().status_requests.len()
    }
}

/// Deterministic simulated account for slot `index`.
pub fn simulated_account(index: usize) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xA0;
    bytes[12..].copy_from_slice(&(index as u64 + 1).to_be_bytes());
    Address::new(bytes)
}

#[async_trait]
impl ContractGateway for InMemoryChain {
    fn session(&self) -> &ConnectedSession {
        &self.session
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainCallError> {
        Ok(self.accounts.clone())
    }

    async fn is_operational(&self) -> Result<bool, ChainCallError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();
        state.enter(ContractMethod::IsOperational, None, None)?;
        Ok(state.operational)
    }

    async fn is_authorized_caller(&self, caller: Address) -> Result<bool, ChainCallError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();
        state.enter(
            ContractMethod::IsAuthorizedCaller,
            None,
            Some(caller.to_string()),
        )?;
        Ok(state.authorized.contains(&caller))
    }

    async fn authorize_contract(
        &self,
        from: Address,
        caller: Address,
    ) -> Result<TxReceipt, ChainCallError> {
        tokio::task::yield_now().await;
        let method = ContractMethod::AuthorizeContract;
        let mut state = self.state.lock();
        state.enter(method, Some(from), Some(caller.to_string()))?;

        if self.accounts.first() != Some(&from) {
            return Err(revert(method, "Caller is not contract owner"));
        }
        state.authorized.insert(caller);
        Ok(state.mine())
    }

    async fn is_airline(&self, airline: Address) -> Result<bool, ChainCallError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();
        state.enter(ContractMethod::IsAirline, None, Some(airline.to_string()))?;
        Ok(state.airlines.contains_key(&airline))
    }

    async fn register_airline(
        &self,
        from: Address,
        airline: Address,
        name: &str,
    ) -> Result<TxReceipt, ChainCallError> {
        tokio::task::yield_now().await;
        let method = ContractMethod::RegisterAirline;
        let mut state = self.state.lock();
        state.enter(method, Some(from), Some(airline.to_string()))?;

        if !state.authorized.contains(&self.session.app_address) {
            return Err(revert(method, "Caller is not authorized"));
        }
        if !state.operational {
            return Err(revert(method, "Contract is currently not operational"));
        }
        if !state.is_funded(&from) {
            return Err(revert(method, "Caller is not a funded airline"));
        }
        if state.airlines.contains_key(&airline) {
            return Err(revert(method, "Airline is already registered"));
        }

        debug!("[fs-01] (sim) registered airline {} {}", name, airline.short());
        state.airlines.insert(
            airline,
            AirlineEntry {
                name: name.to_string(),
                funded: false,
            },
        );
        Ok(state.mine())
    }

    async fn fund_airline(&self, from: Address, stake: Wei) -> Result<TxReceipt, ChainCallError> {
        tokio::task::yield_now().await;
        let method = ContractMethod::FundAirline;
        let mut state = self.state.lock();
        state.enter(method, Some(from), Some(from.to_string()))?;

        if stake < ether(MIN_AIRLINE_FUNDING_ETHER) {
            return Err(revert(method, "Insufficient funding"));
        }
        match state.airlines.get_mut(&from) {
            None => Err(revert(method, "Airline is not registered")),
            Some(entry) if entry.funded => Err(revert(method, "Airline is already funded")),
            Some(entry) => {
                entry.funded = true;
                Ok(state.mine())
            }
        }
    }

    async fn register_flight(
        &self,
        from: Address,
        timestamp: u64,
        code: &str,
    ) -> Result<TxReceipt, ChainCallError> {
        tokio::task::yield_now().await;
        let method = ContractMethod::RegisterFlight;
        let mut state = self.state.lock();
        state.enter(method, Some(from), Some(code.to_string()))?;

        if !state.authorized.contains(&self.session.app_address) {
            return Err(revert(method, "Caller is not authorized"));
        }
        if !state.is_funded(&from) {
            return Err(revert(method, "Caller is not a funded airline"));
        }
        let key = (from, code.to_string(), timestamp);
        if state.flights.contains(&key) {
            return Err(revert(method, "Flight is already registered"));
        }
        state.flights.push(key);
        Ok(state.mine())
    }

    async fn buy_insurance(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        premium: Wei,
    ) -> Result<TxReceipt, ChainCallError> {
        tokio::task::yield_now().await;
        let method = ContractMethod::BuyInsurance;
        let mut state = self.state.lock();
        state.enter(method, Some(from), Some(flight.to_string()))?;

        if premium.is_zero() || premium > ether(MAX_PREMIUM_ETHER) {
            return Err(revert(method, "Premium must be between 0 and 1 ether"));
        }
        let key = (airline, flight.to_string(), timestamp);
        if !state.flights.contains(&key) {
            return Err(revert(method, "Flight is not registered"));
        }
        state.policies.push(InsurancePolicy {
            passenger: from,
            airline,
            flight: flight.to_string(),
            timestamp,
            premium,
        });
        Ok(state.mine())
    }

    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxReceipt, ChainCallError> {
        tokio::task::yield_now().await;
        let method = ContractMethod::FetchFlightStatus;
        let mut state = self.state.lock();
        state.enter(method, Some(from), Some(flight.to_string()))?;

        let key = (airline, flight.to_string(), timestamp);
        if !state.flights.contains(&key) {
            return Err(revert(method, "Flight is not registered"));
        }
        state.status_requests.push(key);
        Ok(state.mine())
    }
}
