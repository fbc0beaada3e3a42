//! # Insurance and Flight-Status Flows
//!
//! User actions against published state. Everything is validated against the
//! view before a transaction is sent.

use crate::adapter::PresentationAdapter;
use crate::domain::PresentationError;
use fs_01_contract_gateway::{ether, Address, ContractGateway, TxReceipt, Wei};
use fs_03_bootstrap::FlightRecord;
use std::sync::Arc;
use tracing::info;

/// Maximum premium accepted by the App contract, in ether.
pub const MAX_PREMIUM_ETHER: u64 = 1;

/// Sends user-initiated transactions on behalf of passengers.
pub struct InsuranceDesk<G: ContractGateway> {
    gateway: Arc<G>,
    view: Arc<PresentationAdapter>,
}

impl<G: ContractGateway> InsuranceDesk<G> {
    /// Create a desk over `view`.
    pub fn new(gateway: Arc<G>, view: Arc<PresentationAdapter>) -> Self {
        Self { gateway, view }
    }

    fn flight(&self, code: &str) -> Result<FlightRecord, PresentationError> {
        self.view
            .flights()
            .into_iter()
            .find(|f| f.flight == code)
            .ok_or_else(|| PresentationError::UnknownFlight(code.to_string()))
    }

    fn is_passenger(&self, account: &Address) -> bool {
        self.view.passengers().iter().any(|p| p.address == *account)
    }

    /// Buy insurance for `flight` from `passenger` with `premium`.
    pub async fn buy_insurance(
        &self,
        passenger: Address,
        flight: &str,
        premium: Wei,
    ) -> Result<TxReceipt, PresentationError> {
        let max = ether(MAX_PREMIUM_ETHER);
        if premium.is_zero() || premium > max {
            return Err(PresentationError::InvalidPremium { premium, max });
        }
        if !self.is_passenger(&passenger) {
            return Err(PresentationError::UnknownPassenger(passenger));
        }
        let record = self.flight(flight)?;

        info!(
            "[fs-04] {} buys insurance on {} for {} wei",
            passenger.short(),
            record.flight,
            premium
        );
        let receipt = self
            .gateway
            .buy_insurance(
                passenger,
                record.airline_address,
                &record.flight,
                record.timestamp,
                premium,
            )
            .await?;
        Ok(receipt)
    }

    /// Ask the oracles for the status of `flight`.
    ///
    /// Allowed for passengers and for the flight's own airline.
    pub async fn request_flight_status(
        &self,
        requester: Address,
        flight: &str,
    ) -> Result<TxReceipt, PresentationError> {
        let record = self.flight(flight)?;
        if requester != record.airline_address && !self.is_passenger(&requester) {
            return Err(PresentationError::UnknownRequester(requester));
        }

        info!(
            "[fs-04] {} requests status of {}",
            requester.short(),
            record.flight
        );
        let receipt = self
            .gateway
            .fetch_flight_status(
                requester,
                record.airline_address,
                &record.flight,
                record.timestamp,
            )
            .await?;
        Ok(receipt)
    }
}
