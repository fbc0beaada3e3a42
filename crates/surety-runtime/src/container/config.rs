//! # Runtime Configuration
//!
//! `surety.toml` plus environment overrides.
//!
//! ```toml
//! profile = "localhost"
//!
//! [profiles.localhost]
//! url = "http://localhost:8545"
//! data_address = "0x..."
//! app_address = "0x..."
//!
//! [gas]
//! limit = 4712388
//! price = 100000000000
//!
//! [roles]
//! airline_offset = 1
//! passenger_offset = 11
//! # flight_operator = 5
//!
//! [bootstrap]
//! airline_stake_ether = 10
//! seed_path = "data.json"
//!
//! [cache]
//! path = "./.surety/cache.json"
//!
//! [rpc]
//! timeout_secs = 30
//! receipt_poll_attempts = 20
//! receipt_poll_interval_ms = 250
//! ```
//!
//! Environment overrides: `FS_PROFILE`, `FS_RPC_URL`, `FS_CACHE_PATH`,
//! `FS_SEED_PATH`.

use fs_01_contract_gateway::{ether, Address, ConnectedSession, GasParams, ReceiptPolling};
use fs_03_bootstrap::{BootstrapConfig, RoleLayout, DEFAULT_AIRLINE_STAKE_ETHER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the profile used when none is selected.
pub const DEFAULT_PROFILE: &str = "localhost";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {error}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        error: String,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(String),

    /// The selected profile is not defined.
    #[error("profile '{0}' is not defined")]
    UnknownProfile(String),

    /// A contract address is missing or malformed.
    #[error("profile '{profile}': invalid {field} '{value}'")]
    InvalidAddress {
        /// Profile name.
        profile: String,
        /// `app_address` or `data_address`.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// A numeric setting is out of range.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Setting name.
        field: &'static str,
    },

    /// Passenger slots start inside the airline candidate range.
    #[error("passenger_offset {passenger_offset} must not be below airline_offset {airline_offset}")]
    RoleOffsets {
        /// `[roles] airline_offset`.
        airline_offset: usize,
        /// `[roles] passenger_offset`.
        passenger_offset: usize,
    },
}

/// One deployment target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// JSON-RPC endpoint.
    pub url: String,
    /// FlightSuretyData address.
    pub data_address: String,
    /// FlightSuretyApp address.
    pub app_address: String,
}

/// Gas settings for every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    /// Gas limit.
    pub limit: u64,
    /// Gas price in wei.
    pub price: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        let gas = GasParams::default();
        Self {
            limit: gas.limit,
            price: gas.price,
        }
    }
}

/// Account slot layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    /// First airline candidate slot.
    pub airline_offset: usize,
    /// First passenger slot.
    pub passenger_offset: usize,
    /// Dedicated flight operator slot; absent means the owner.
    pub flight_operator: Option<usize>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        let layout = RoleLayout::default();
        Self {
            airline_offset: layout.airline_offset,
            passenger_offset: layout.passenger_offset,
            flight_operator: layout.flight_operator,
        }
    }
}

/// Bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSection {
    /// Stake sent with each `fundAirline`, in whole ether.
    pub airline_stake_ether: u64,
    /// Seed dataset file.
    pub seed_path: PathBuf,
}

impl Default for BootstrapSection {
    fn default() -> Self {
        Self {
            airline_stake_ether: DEFAULT_AIRLINE_STAKE_ETHER,
            seed_path: PathBuf::from("data.json"),
        }
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file.
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./.surety/cache.json"),
        }
    }
}

/// JSON-RPC client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Request timeout.
    pub timeout_secs: u64,
    /// Receipt polls before giving up.
    pub receipt_poll_attempts: u32,
    /// Delay between receipt polls.
    pub receipt_poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            receipt_poll_attempts: 20,
            receipt_poll_interval_ms: 250,
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuretyConfig {
    /// Selected profile name.
    pub profile: String,
    /// Deployment targets by name.
    pub profiles: BTreeMap<String, ProfileConfig>,
    /// Gas settings.
    pub gas: GasConfig,
    /// Account slot layout.
    pub roles: RolesConfig,
    /// Bootstrap settings.
    pub bootstrap: BootstrapSection,
    /// Cache settings.
    pub cache: CacheConfig,
    /// JSON-RPC settings.
    pub rpc: RpcConfig,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            DEFAULT_PROFILE.to_string(),
            ProfileConfig {
                url: "http://localhost:8545".to_string(),
                ..Default::default()
            },
        );
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            profiles,
            gas: GasConfig::default(),
            roles: RolesConfig::default(),
            bootstrap: BootstrapSection::default(),
            cache: CacheConfig::default(),
            rpc: RpcConfig::default(),
        }
    }
}

impl SuretyConfig {
    /// Read `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `FS_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = lookup("FS_PROFILE").filter(|v| !v.is_empty()) {
            self.profile = profile;
        }
        if let Some(url) = lookup("FS_RPC_URL").filter(|v| !v.is_empty()) {
            self.profiles.entry(self.profile.clone()).or_default().url = url;
        }
        if let Some(path) = lookup("FS_CACHE_PATH").filter(|v| !v.is_empty()) {
            self.cache.path = PathBuf::from(path);
        }
        if let Some(path) = lookup("FS_SEED_PATH").filter(|v| !v.is_empty()) {
            self.bootstrap.seed_path = PathBuf::from(path);
        }
    }

    /// Check settings that do not depend on the contracts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gas.limit == 0 {
            return Err(ConfigError::Zero { field: "gas.limit" });
        }
        if self.bootstrap.airline_stake_ether == 0 {
            return Err(ConfigError::Zero {
                field: "bootstrap.airline_stake_ether",
            });
        }
        if self.rpc.timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "rpc.timeout_secs",
            });
        }
        if self.rpc.receipt_poll_attempts == 0 {
            return Err(ConfigError::Zero {
                field: "rpc.receipt_poll_attempts",
            });
        }
        if self.roles.passenger_offset < self.roles.airline_offset {
            return Err(ConfigError::RoleOffsets {
                airline_offset: self.roles.airline_offset,
                passenger_offset: self.roles.passenger_offset,
            });
        }
        Ok(())
    }

    /// The selected profile.
    pub fn active_profile(&self) -> Result<&ProfileConfig, ConfigError> {
        self.profiles
            .get(&self.profile)
            .ok_or_else(|| ConfigError::UnknownProfile(self.profile.clone()))
    }

    /// Build the immutable session for the selected profile.
    pub fn session(&self) -> Result<ConnectedSession, ConfigError> {
        let profile = self.active_profile()?;
        let app = self.parse_address("app_address", &profile.app_address)?;
        let data = self.parse_address("data_address", &profile.data_address)?;
        Ok(ConnectedSession::new(profile.url.clone(), app, data).with_gas(self.gas_params()))
    }

    fn parse_address(&self, field: &'static str, value: &str) -> Result<Address, ConfigError> {
        value.parse::<Address>().map_err(|_| ConfigError::InvalidAddress {
            profile: self.profile.clone(),
            field,
            value: value.to_string(),
        })
    }

    /// Gas parameters for writes.
    pub fn gas_params(&self) -> GasParams {
        GasParams {
            limit: self.gas.limit,
            price: self.gas.price,
        }
    }

    /// Role layout for account assignment.
    pub fn role_layout(&self) -> RoleLayout {
        RoleLayout {
            airline_offset: self.roles.airline_offset,
            passenger_offset: self.roles.passenger_offset,
            flight_operator: self.roles.flight_operator,
        }
    }

    /// Orchestrator tunables.
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            airline_stake: ether(self.bootstrap.airline_stake_ether),
        }
    }

    /// HTTP request timeout.
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_secs)
    }

    /// Receipt polling schedule.
    pub fn receipt_polling(&self) -> ReceiptPolling {
        ReceiptPolling {
            attempts: self.rpc.receipt_poll_attempts,
            interval: Duration::from_millis(self.rpc.receipt_poll_interval_ms),
        }
    }
}
