//! # Domain Errors
//!
//! Error types for gateway calls.

use super::value_objects::{ContractMethod, TxHash};
use serde_json::Value;
use thiserror::Error;

/// Failure of a chain read or write.
///
/// The gateway never retries; the caller decides what a failure means.
#[derive(Debug, Error)]
pub enum ChainCallError {
    /// The transport failed before a JSON-RPC response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
        /// Optional `data` member, such as an encoded revert payload
        data: Option<Value>,
    },

    /// The transaction was mined but reverted.
    #[error("{method} reverted: {reason}")]
    Reverted {
        /// Method that reverted
        method: ContractMethod,
        /// Revert reason, when known
        reason: String,
        /// Hash of the reverted transaction, when known
        tx_hash: Option<TxHash>,
    },

    /// The response could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No receipt appeared within the polling budget.
    #[error("No receipt for {0} after polling")]
    MissingReceipt(TxHash),
}

impl ChainCallError {
    /// Metrics/log label for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Rpc { .. } => "rpc",
            Self::Reverted { .. } => "reverted",
            Self::Decode(_) => "decode",
            Self::MissingReceipt(_) => "missing_receipt",
        }
    }
}

/// Invalid address or hash literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// Wrong number of hex digits.
    #[error("Expected 40 or 64 hex digits, got {0}")]
    Length(usize),
    /// Not valid hex.
    #[error("Invalid hex: {0}")]
    Hex(String),
}
