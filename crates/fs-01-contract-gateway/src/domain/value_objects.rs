//! # Value Objects
//!
//! Immutable primitives shared by every gateway call: addresses, amounts,
//! gas parameters and the connected session.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use primitive_types::U256;

use super::errors::AddressParseError;

/// Amount of native token, in wei.
pub type Wei = U256;

/// One ether in wei.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Convert whole ether units to wei.
pub fn ether(units: u64) -> Wei {
    U256::from(units) * U256::from(WEI_PER_ETHER)
}

/// Parse a decimal ether amount (`"0.5"`, `"1"`) into wei.
///
/// At most 18 fractional digits; no sign, no exponent.
pub fn parse_ether(s: &str) -> Option<Wei> {
    let s = s.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if (whole.is_empty() && frac.is_empty()) || frac.len() > 18 {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).ok()?
    };
    let frac = if frac.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&format!("{:0<18}", frac)).ok()?
    };
    whole
        .checked_mul(U256::from(WEI_PER_ETHER))?
        .checked_add(frac)
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account or contract address.
///
/// Serialized as a `0x`-prefixed lowercase hex string so that persisted cache
/// payloads stay readable and compatible with the chain's JSON-RPC encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Short form for log lines (`0xabcd…1234`).
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if stripped.len() != 40 {
            return Err(AddressParseError::Length(stripped.len()));
        }
        let bytes = hex::decode(stripped).map_err(|e| AddressParseError::Hex(e.to_string()))?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for TxHash {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() != 64 {
            return Err(AddressParseError::Length(stripped.len()));
        }
        let bytes = hex::decode(stripped).map_err(|e| AddressParseError::Hex(e.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

/// Receipt of a mined write call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was mined in.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: Option<u64>,
}

// =============================================================================
// GAS + SESSION
// =============================================================================

/// Fixed gas parameters applied to every write.
///
/// Configured once per session; never derived from network conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasParams {
    /// Gas limit per transaction.
    pub limit: u64,
    /// Gas price in wei.
    pub price: u64,
}

impl Default for GasParams {
    fn default() -> Self {
        Self {
            limit: 4_712_388,
            price: 100_000_000_000,
        }
    }
}

/// The connected session: endpoint plus the two deployed contract addresses.
///
/// Built once at startup and handed to the gateway at construction; nothing
/// reassigns contract handles afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectedSession {
    /// Chain RPC endpoint.
    pub rpc_url: String,
    /// FlightSuretyApp contract.
    pub app_address: Address,
    /// FlightSuretyData contract.
    pub data_address: Address,
    /// Gas parameters for writes.
    pub gas: GasParams,
}

impl ConnectedSession {
    /// Create a session with default gas parameters.
    pub fn new(rpc_url: impl Into<String>, app_address: Address, data_address: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            app_address,
            data_address,
            gas: GasParams::default(),
        }
    }

    /// Override the gas parameters.
    pub fn with_gas(mut self, gas: GasParams) -> Self {
        self.gas = gas;
        self
    }
}

/// Contract methods driven by this layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractMethod {
    /// Data contract: `isOperational()`.
    IsOperational,
    /// Data contract: `isAuthorizedCaller(address)`.
    IsAuthorizedCaller,
    /// Data contract: `authorizeContract(address)`, owner only.
    AuthorizeContract,
    /// App contract: `isAirline(address)`.
    IsAirline,
    /// App contract: `registerAirline(address,string)`.
    RegisterAirline,
    /// App contract: `fundAirline()`, payable.
    FundAirline,
    /// App contract: `registerFlight(uint256,string)`.
    RegisterFlight,
    /// App contract: `buyInsurance(address,string,uint256)`, payable.
    BuyInsurance,
    /// App contract: `fetchFlightStatus(address,string,uint256)`.
    FetchFlightStatus,
}

impl ContractMethod {
    /// Canonical Solidity signature used to derive the selector.
    pub fn signature(&self) -> &'static str {
        match self {
            Self::IsOperational => "isOperational()",
            Self::IsAuthorizedCaller => "isAuthorizedCaller(address)",
            Self::AuthorizeContract => "authorizeContract(address)",
            Self::IsAirline => "isAirline(address)",
            Self::RegisterAirline => "registerAirline(address,string)",
            Self::FundAirline => "fundAirline()",
            Self::RegisterFlight => "registerFlight(uint256,string)",
            Self::BuyInsurance => "buyInsurance(address,string,uint256)",
            Self::FetchFlightStatus => "fetchFlightStatus(address,string,uint256)",
        }
    }

    /// Method name as it appears in logs and metrics labels.
    pub fn name(&self) -> &'static str {
        let sig = self.signature();
        match sig.find('(') {
            Some(idx) => &sig[..idx],
            None => sig,
        }
    }

    /// Whether the method is a read (`eth_call`, no sender, no state change).
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Self::IsOperational | Self::IsAuthorizedCaller | Self::IsAirline
        )
    }

    /// Whether the method lives on the Data contract rather than the App contract.
    pub fn targets_data_contract(&self) -> bool {
        matches!(self, Self::IsAuthorizedCaller | Self::AuthorizeContract)
    }
}

impl fmt::Display for ContractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
