use crate::config::Config;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Attempts per JSON-RPC call, including the first one.
pub const TRANSPORT_MAX_ATTEMPTS: usize = 5;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Node {node} answered with HTTP {status}")]
    Status { node: String, status: u16 },

    #[error("RPC error from {node} ({code}): {message}")]
    Rpc {
        node: String,
        code: i64,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No available node among {0} candidates")]
    NoAvailableNode(usize),

    #[error("All nodes failed to respond after {attempts} attempts")]
    AllNodesFailed { attempts: usize },
}

impl ClientError {
    /// Network-level failures and upstream 502s are worth another attempt on the
    /// same node; everything else goes straight back to the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(e) => {
                e.status().is_none() && (e.is_connect() || e.is_timeout() || e.is_request())
            }
            ClientError::Status { status, .. } => *status == 502,
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'a str,
    params: &'a Value,
}

impl<'a> RpcRequest<'a> {
    fn new(method: &'a str, params: &'a Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: "0",
            method,
            params,
        }
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// One JSON-RPC round trip against a single node.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(
        &self,
        node: &str,
        method: &str,
        params: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError>;

    /// Single attempt with no transport-level retry.
    async fn call_once(
        &self,
        node: &str,
        method: &str,
        params: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        self.call(node, method, params, timeout).await
    }
}

/// `reqwest` transport posting to `<node>/json_rpc`.
pub struct HttpTransport {
    http: reqwest::Client,
    retry_min_delay: Duration,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Self::with_timeout(Duration::from_secs(config.rpc_timeout_secs))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientError> {
        info!("Initializing JSON-RPC transport with timeout {:?}", timeout);

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            retry_min_delay: Duration::from_secs(1),
        })
    }

    /// First backoff delay; later retries double it.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_min_delay = delay;
        self
    }

    async fn post_once(
        &self,
        node: &str,
        body: &RpcRequest<'_>,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/json_rpc", node.trim_end_matches('/'));
        let mut request = self.http.post(&url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                node: node.to_string(),
                status: status.as_u16(),
            });
        }

        let payload: RpcResponse = response.json().await?;
        if let Some(err) = payload.error {
            return Err(ClientError::Rpc {
                node: node.to_string(),
                code: err.code,
                message: err.message,
            });
        }

        payload.result.ok_or_else(|| {
            ClientError::MalformedResponse(format!("{} returned no result for {}", node, body.method))
        })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(
        &self,
        node: &str,
        method: &str,
        params: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        let body = RpcRequest::new(method, &params);
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_min_delay)
            .with_max_times(TRANSPORT_MAX_ATTEMPTS - 1);

        (|| async { self.post_once(node, &body, timeout).await })
            .retry(backoff)
            .when(|e: &ClientError| e.is_retryable())
            .notify(|e: &ClientError, after: Duration| {
                warn!("Retrying {} on {} in {:?}: {}", method, node, after, e);
            })
            .await
    }

    async fn call_once(
        &self,
        node: &str,
        method: &str,
        params: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, ClientError> {
        self.post_once(node, &RpcRequest::new(method, &params), timeout)
            .await
    }
}
