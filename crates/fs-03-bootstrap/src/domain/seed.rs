//! # Seed Dataset
//!
//! Static input consumed positionally against the account list:
//!
//! ```json
//! {
//!   "firstAirline": "Genesis Air",
//!   "airlines": ["Delta", "United"],
//!   "flights": [{"flight": "ND1309", "timestamp": "2022-05-01T10:00:00Z"}],
//!   "passengers": ["Alice", "Bob"]
//! }
//! ```

use super::errors::SeedError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naive date-time layouts accepted after RFC 3339, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One seed flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFlight {
    /// Flight code.
    pub flight: String,
    /// Departure date string.
    pub timestamp: String,
}

/// The seed dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDataset {
    /// Display name of the pre-registered first airline (the owner account).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_airline: Option<String>,
    /// Candidate airline names, in slot order.
    #[serde(default)]
    pub airlines: Vec<String>,
    /// Flights to register.
    #[serde(default)]
    pub flights: Vec<SeedFlight>,
    /// Passenger names, in slot order.
    #[serde(default)]
    pub passengers: Vec<String>,
}

impl SeedDataset {
    /// Parse from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a seed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check every flight timestamp parses.
    pub fn validate(&self) -> Result<(), SeedError> {
        for flight in &self.flights {
            parse_timestamp(&flight.flight, &flight.timestamp)?;
        }
        Ok(())
    }
}

/// Parse a seed date string into epoch milliseconds.
///
/// Accepts RFC 3339 (`2022-05-01T10:00:00Z`, offsets honoured), naive
/// date-times and bare dates. Values without an offset are UTC.
pub fn parse_timestamp(flight: &str, value: &str) -> Result<u64, SeedError> {
    let invalid = || SeedError::InvalidTimestamp {
        flight: flight.to_string(),
        value: value.to_string(),
    };
    let trimmed = value.trim();

    let millis = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        dt.timestamp_millis()
    } else if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        naive.and_utc().timestamp_millis()
    } else {
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())?;
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(invalid)?
            .and_utc()
            .timestamp_millis()
    };

    u64::try_from(millis).map_err(|_| invalid())
}
