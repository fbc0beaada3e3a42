//! HTTP JSON-RPC Transport Adapter
//!
//! Implements `RpcTransport` with `reqwest` against a chain node endpoint.

use crate::domain::ChainCallError;
use crate::ports::RpcTransport;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// HTTP transport for a single RPC endpoint.
pub struct HttpTransport {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ChainCallError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| ChainCallError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainCallError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };
        trace!("[fs-01] -> {} #{}", method, request.id);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ChainCallError::Transport(format!("Cannot connect to {}", self.url))
                } else {
                    ChainCallError::Transport(e.to_string())
                }
            })?;

        let rpc: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ChainCallError::Decode(e.to_string()))?;

        if let Some(error) = rpc.error {
            return Err(ChainCallError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        // A null result is meaningful (e.g. a receipt that is not mined yet).
        Ok(rpc.result.unwrap_or(Value::Null))
    }
}
