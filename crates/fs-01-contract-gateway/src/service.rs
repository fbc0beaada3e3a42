//! # RPC Contract Gateway
//!
//! Implements [`ContractGateway`] on top of any [`RpcTransport`]: reads go
//! through `eth_call`, writes through `eth_sendTransaction` followed by
//! receipt polling.

use crate::domain::abi::{self, Token};
use crate::domain::{
    Address, ChainCallError, ConnectedSession, ContractMethod, TxHash, TxReceipt, Wei, U256,
};
use crate::ports::{ContractGateway, RpcTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for a write to be mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiptPolling {
    /// Number of `eth_getTransactionReceipt` attempts.
    pub attempts: u32,
    /// Delay between attempts.
    pub interval: Duration,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(250),
        }
    }
}

/// Gateway backed by a JSON-RPC node.
pub struct RpcContractGateway<T: RpcTransport> {
    session: ConnectedSession,
    transport: T,
    polling: ReceiptPolling,
}

impl<T: RpcTransport> RpcContractGateway<T> {
    /// Create a gateway for `session` over `transport`.
    pub fn new(session: ConnectedSession, transport: T) -> Self {
        Self {
            session,
            transport,
            polling: ReceiptPolling::default(),
        }
    }

    /// Override receipt polling.
    pub fn with_receipt_polling(mut self, polling: ReceiptPolling) -> Self {
        self.polling = polling;
        self
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn target(&self, method: ContractMethod) -> Address {
        if method.targets_data_contract() {
            self.session.data_address
        } else {
            self.session.app_address
        }
    }

    async fn read(
        &self,
        method: ContractMethod,
        tokens: &[Token],
    ) -> Result<Vec<u8>, ChainCallError> {
        let data = abi::encode_call(method, tokens);
        let params = json!([
            {
                "to": self.target(method).to_string(),
                "data": format!("0x{}", hex::encode(&data)),
            },
            "latest"
        ]);

        let result = self.transport.request("eth_call", params).await;
        surety_telemetry::record_chain_call(method.name(), result.is_ok());

        let value = result.map_err(|e| revert_from_rpc(method, e))?;
        let raw = value
            .as_str()
            .ok_or_else(|| ChainCallError::Decode(format!("eth_call returned {}", value)))?;
        abi::decode_hex(raw)
    }

    async fn read_bool(
        &self,
        method: ContractMethod,
        tokens: &[Token],
    ) -> Result<bool, ChainCallError> {
        let bytes = self.read(method, tokens).await?;
        abi::decode_bool(&bytes)
    }

    async fn write(
        &self,
        method: ContractMethod,
        from: Address,
        tokens: &[Token],
        value: Option<Wei>,
    ) -> Result<TxReceipt, ChainCallError> {
        let data = abi::encode_call(method, tokens);
        let mut tx = json!({
            "from": from.to_string(),
            "to": self.target(method).to_string(),
            "gas": format!("0x{:x}", self.session.gas.limit),
            "gasPrice": format!("0x{:x}", self.session.gas.price),
            "data": format!("0x{}", hex::encode(&data)),
        });
        if let Some(value) = value {
            tx["value"] = Value::String(format!("0x{:x}", value));
        }

        debug!("[fs-01] Sending {} from {}", method, from.short());

        let result = self.send_and_wait(method, tx).await;
        surety_telemetry::record_chain_call(method.name(), result.is_ok());
        if let Err(e) = &result {
            warn!("[fs-01] {} from {} failed: {}", method, from.short(), e);
        }
        result
    }

    async fn send_and_wait(
        &self,
        method: ContractMethod,
        tx: Value,
    ) -> Result<TxReceipt, ChainCallError> {
        let hash_value = self
            .transport
            .request("eth_sendTransaction", json!([tx]))
            .await
            .map_err(|e| revert_from_rpc(method, e))?;

        let tx_hash: TxHash = hash_value
            .as_str()
            .ok_or_else(|| ChainCallError::Decode(format!("tx hash was {}", hash_value)))?
            .parse()
            .map_err(|e| ChainCallError::Decode(format!("tx hash: {}", e)))?;

        self.await_receipt(method, tx_hash).await
    }

    async fn await_receipt(
        &self,
        method: ContractMethod,
        tx_hash: TxHash,
    ) -> Result<TxReceipt, ChainCallError> {
        for attempt in 0..self.polling.attempts {
            let receipt = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
                .await?;

            if receipt.is_null() {
                if attempt + 1 < self.polling.attempts {
                    tokio::time::sleep(self.polling.interval).await;
                }
                continue;
            }

            let status = receipt.get("status").and_then(Value::as_str).unwrap_or("0x1");
            if status == "0x0" {
                return Err(ChainCallError::Reverted {
                    method,
                    reason: "transaction status 0x0".to_string(),
                    tx_hash: Some(tx_hash),
                });
            }

            let receipt = TxReceipt {
                tx_hash,
                block_number: hex_quantity(receipt.get("blockNumber")),
                gas_used: hex_quantity(receipt.get("gasUsed")),
            };
            info!(
                "[fs-01] {} mined in block {:?} ({})",
                method, receipt.block_number, tx_hash
            );
            return Ok(receipt);
        }

        Err(ChainCallError::MissingReceipt(tx_hash))
    }
}

/// Nodes such as ganache report reverts as RPC errors on submission.
///
/// The reason comes from an `Error(string)` payload in the error `data`
/// when the node sends one, otherwise from the error message.
fn revert_from_rpc(method: ContractMethod, err: ChainCallError) -> ChainCallError {
    match err {
        ChainCallError::Rpc {
            code,
            message,
            data,
        } => match data.as_ref().and_then(revert_reason) {
            Some(reason) => ChainCallError::Reverted {
                method,
                reason,
                tx_hash: None,
            },
            None if message.contains("revert") => ChainCallError::Reverted {
                method,
                reason: message,
                tx_hash: None,
            },
            None => ChainCallError::Rpc {
                code,
                message,
                data,
            },
        },
        other => other,
    }
}

/// Geth sends the payload as a hex string; ganache nests it per transaction
/// hash under `return`.
fn revert_reason(data: &Value) -> Option<String> {
    match data {
        Value::String(raw) => abi::decode_hex(raw)
            .ok()
            .and_then(|bytes| abi::decode_revert_reason(&bytes)),
        Value::Object(fields) => fields.values().find_map(revert_reason),
        _ => None,
    }
}

fn hex_quantity(value: Option<&Value>) -> Option<u64> {
    let s = value?.as_str()?;
    u64::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16).ok()
}

#[async_trait]
impl<T: RpcTransport> ContractGateway for RpcContractGateway<T> {
    fn session(&self) -> &ConnectedSession {
        &self.session
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainCallError> {
        let value = self.transport.request("eth_accounts", json!([])).await?;
        let list = value
            .as_array()
            .ok_or_else(|| ChainCallError::Decode(format!("eth_accounts returned {}", value)))?;
        list.iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| ChainCallError::Decode("account is not a string".to_string()))?
                    .parse::<Address>()
                    .map_err(|e| ChainCallError::Decode(e.to_string()))
            })
            .collect()
    }

    async fn is_operational(&self) -> Result<bool, ChainCallError> {
        self.read_bool(ContractMethod::IsOperational, &[]).await
    }

    async fn is_authorized_caller(&self, caller: Address) -> Result<bool, ChainCallError> {
        self.read_bool(ContractMethod::IsAuthorizedCaller, &[Token::Address(caller)])
            .await
    }

    async fn authorize_contract(
        &self,
        from: Address,
        caller: Address,
    ) -> Result<TxReceipt, ChainCallError> {
        self.write(
            ContractMethod::AuthorizeContract,
            from,
            &[Token::Address(caller)],
            None,
        )
        .await
    }

    async fn is_airline(&self, airline: Address) -> Result<bool, ChainCallError> {
        self.read_bool(ContractMethod::IsAirline, &[Token::Address(airline)])
            .await
    }

    async fn register_airline(
        &self,
        from: Address,
        airline: Address,
        name: &str,
    ) -> Result<TxReceipt, ChainCallError> {
        self.write(
            ContractMethod::RegisterAirline,
            from,
            &[Token::Address(airline), Token::String(name.to_string())],
            None,
        )
        .await
    }

    async fn fund_airline(&self, from: Address, stake: Wei) -> Result<TxReceipt, ChainCallError> {
        self.write(ContractMethod::FundAirline, from, &[], Some(stake))
            .await
    }

    async fn register_flight(
        &self,
        from: Address,
        timestamp: u64,
        code: &str,
    ) -> Result<TxReceipt, ChainCallError> {
        self.write(
            ContractMethod::RegisterFlight,
            from,
            &[Token::Uint(U256::from(timestamp)), Token::String(code.to_string())],
            None,
        )
        .await
    }

    async fn buy_insurance(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        premium: Wei,
    ) -> Result<TxReceipt, ChainCallError> {
        self.write(
            ContractMethod::BuyInsurance,
            from,
            &[
                Token::Address(airline),
                Token::String(flight.to_string()),
                Token::Uint(U256::from(timestamp)),
            ],
            Some(premium),
        )
        .await
    }

    async fn fetch_flight_status(
        &self,
        from: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<TxReceipt, ChainCallError> {
        self.write(
            ContractMethod::FetchFlightStatus,
            from,
            &[
                Token::Address(airline),
                Token::String(flight.to_string()),
                Token::Uint(U256::from(timestamp)),
            ],
            None,
        )
        .await
    }
}
