//! # Presentation Errors

use fs_01_contract_gateway::{Address, ChainCallError, Wei};
use thiserror::Error;

/// Errors of the insurance and flight-status flows.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// No published flight with this code.
    #[error("unknown flight '{0}'")]
    UnknownFlight(String),

    /// Account is not in the passenger projection.
    #[error("{0} is not a known passenger")]
    UnknownPassenger(Address),

    /// Account is neither a passenger nor the flight's airline.
    #[error("{0} may not request status for this flight")]
    UnknownRequester(Address),

    /// Premium outside `(0, 1 ether]`.
    #[error("premium {premium} wei is outside (0, {max}] wei")]
    InvalidPremium {
        /// Offered premium.
        premium: Wei,
        /// Maximum accepted premium.
        max: Wei,
    },

    /// The contract call failed.
    #[error("contract call failed: {0}")]
    Chain(#[from] ChainCallError),
}
