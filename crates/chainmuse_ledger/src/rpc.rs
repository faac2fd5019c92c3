//! Minimal JSON-RPC 2.0 client for a Sui fullnode.

use crate::dto::{ObjectData, ObjectResponse};
use crate::parse::is_move_type;
use chainmuse_error::{LedgerError, LedgerErrorKind};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, instrument};

/// Failure of a single RPC call, before it is given ledger meaning.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RpcFailure {
    /// Connection or HTTP-level failure
    #[display("transport: {}", _0)]
    Transport(String),
    /// No answer within the configured timeout
    #[display("timed out after {}s", _0)]
    Timeout(u64),
    /// The node answered with a JSON-RPC error object
    #[display("rpc error {}: {}", code, message)]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },
    /// The answer could not be decoded into the expected shape
    #[display("malformed response: {}", _0)]
    Decode(String),
}

impl RpcFailure {
    /// Interpret the failure as a read-side error.
    #[track_caller]
    pub fn into_query_error(self) -> LedgerError {
        LedgerError::new(LedgerErrorKind::QueryUnavailable(self.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one fullnode endpoint.
#[derive(Debug)]
pub struct SuiRpcClient {
    client: reqwest::Client,
    url: String,
    timeout_secs: u64,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    /// Create a client for `url`, applying `timeout_secs` to every call.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                LedgerError::new(LedgerErrorKind::Transport(format!(
                    "failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self {
            client,
            url: url.into(),
            timeout_secs,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Invoke `method` with positional `params`.
    #[instrument(skip(self, params), fields(url = %self.url))]
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_failure(e))?;
        debug!(id, status = status.as_u16(), bytes = text.len(), "RPC response");

        let envelope: RpcEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                RpcFailure::Decode(e.to_string())
            } else {
                RpcFailure::Transport(format!("HTTP {}: {}", status, text))
            }
        })?;

        if let Some(error) = envelope.error {
            return Err(RpcFailure::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| RpcFailure::Decode(format!("{} returned no result", method)))
    }

    /// Fetch `object_id` and keep it only if it is a `module::name` Move object.
    ///
    /// Missing objects and objects of any other type are `None`.
    #[instrument(skip(self), fields(url = %self.url))]
    pub(crate) async fn get_move_object(
        &self,
        object_id: &str,
        module: &str,
        name: &str,
    ) -> Result<Option<ObjectData>, RpcFailure> {
        let response: ObjectResponse = self
            .call("sui_getObject", json!([object_id, object_options()]))
            .await?;

        let Some(object) = response.data else {
            debug!(error = ?response.error, "Object not found");
            return Ok(None);
        };
        let matches = object
            .object_type
            .as_deref()
            .is_some_and(|t| is_move_type(t, module, name));
        if !matches {
            debug!(object_type = ?object.object_type, "Object has another type");
            return Ok(None);
        }
        Ok(Some(object))
    }

    fn transport_failure(&self, err: reqwest::Error) -> RpcFailure {
        if err.is_timeout() {
            RpcFailure::Timeout(self.timeout_secs)
        } else {
            RpcFailure::Transport(err.to_string())
        }
    }
}

/// Object fields requested whenever a node object is read.
pub(crate) fn object_options() -> Value {
    json!({
        "showContent": true,
        "showType": true,
        "showOwner": true,
        "showPreviousTransaction": true,
    })
}
