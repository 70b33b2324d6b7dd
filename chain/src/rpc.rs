//! JSON-RPC transport shared by the chain client and the wallet signer.

use serde_json::Value;
use std::time::Duration;

use crate::error::ChainError;

/// HTTP client for a node's JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the node's base URL. Requests are JSON
/// objects carrying an `action` field; responses carry either `result` or an
/// `error` string.
#[derive(Clone)]
pub struct RpcTransport {
    http: reqwest::Client,
    node_url: String,
}

impl RpcTransport {
    /// Create a transport targeting the given base URL (e.g. `http://127.0.0.1:8545`).
    pub fn new(node_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    /// The configured node URL.
    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send a request and return the `result` field.
    pub async fn call(&self, action: &str, params: Value) -> Result<Value, ChainError> {
        let body = Self::request_body(action, params)?;
        tracing::trace!(action, "rpc request");

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChainError::Node(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ChainError::decode(action, e))?;

        Self::unwrap_result(json)
    }

    fn request_body(action: &str, params: Value) -> Result<Value, ChainError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| ChainError::InvalidRequest("params must be a JSON object".into()))?
            .insert("action".to_string(), Value::from(action));
        Ok(body)
    }

    fn unwrap_result(json: Value) -> Result<Value, ChainError> {
        if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
            return Err(ChainError::Node(err.to_string()));
        }
        Ok(json.get("result").cloned().unwrap_or(json))
    }
}
