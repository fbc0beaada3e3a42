//! # Outbound Ports
//!
//! JSON-RPC transport the RPC-backed gateway depends on.

use crate::domain::ChainCallError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

/// JSON-RPC transport - outbound port.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue one JSON-RPC request and return its `result` member.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainCallError>;
}

// =============================================================================
// Scripted Transport for Testing
// =============================================================================

/// Transport that replays scripted responses per RPC method.
///
/// Each method has a FIFO queue; an unscripted request fails with a
/// transport error. Every request is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, ChainCallError>>>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result for `method`.
    pub fn respond(&self, method: &str, result: Value) -> &Self {
        self.responses
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(result));
        self
    }

    /// Queue a failure for `method`.
    pub fn fail(&self, method: &str, error: ChainCallError) -> &Self {
        self.responses
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(Err(error));
        self
    }

    /// All requests issued so far.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    /// Requests issued for one method.
    pub fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainCallError> {
        self.requests.lock().push((method.to_string(), params));
        self.responses
            .lock()
            .get_mut(method)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| {
                Err(ChainCallError::Transport(format!(
                    "no scripted response for {}",
                    method
                )))
            })
    }
}
