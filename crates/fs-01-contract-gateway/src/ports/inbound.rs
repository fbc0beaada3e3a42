//! # Inbound Ports
//!
//! The gateway API: one typed call per contract method the client drives.

use crate::domain::{Address, ChainCallError, ConnectedSession, TxReceipt, Wei};
use async_trait::async_trait;

/// Contract Gateway - inbound port.
///
/// Reads take no sender and change no state. Writes are sent from `from`
/// with the session's fixed gas parameters and either return a receipt or
/// fail with [`ChainCallError`]. No call is retried.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// The session this gateway was constructed with.
    fn session(&self) -> &ConnectedSession;

    /// Accounts exposed by the connected node, in node order.
    async fn accounts(&self) -> Result<Vec<Address>, ChainCallError>;

    /// `App.isOperational()`
    async fn is_operational(&self) -> Result<bool, ChainCallError>;

    /// `Data.isAuthorizedCaller(caller)`
    async fn is_authorized_caller(&self, caller: Address) -> Result<bool, ChainCallError>;

    /// `Data.authorizeContract(caller)` sent from `from`.
    async fn authorize_contract(
        &self,
        from: Address,
        caller: Address,
    ) -> Result<TxReceipt, ChainCallError>;

    /// `App.isAirline(airline)`
    async fn is_airline(&self, airline: Address) -> Result<bool, ChainCallError>;

    /// `App.registerAirline(airline, name)` sent from `from`.
    async fn register_airline(
        &self,
        from: Address,
        airline: Address,
        name: &str,
    ) -> Result<TxReceipt, ChainCallError>;

    /// `App.fundAirline()` sent from the airline itself with `stake` attached.
    async fn fund_airline(&self, from: Address, stake: Wei) -> Result<TxReceipt, ChainCallError>;

    /// `App.registerFlight(timestamp, code)` sent from the operating airline.
    async fn register_flight(
        &self,
        from: Address,
        timestamp: u64,
        code: &str,
    ) -> Result<TxReceipt, ChainCallError>;

    /// `App.buyInsurance(airline, flight, timestamp)` sent from a passenger with `premium` attached.
    async fn buy_insurance(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        premium: Wei,
    ) -> Result<TxReceipt, ChainCallError>;

    /// `App.fetchFlightStatus(airline, flight, timestamp)` sent from `from`.
    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxReceipt, ChainCallError>;
}
