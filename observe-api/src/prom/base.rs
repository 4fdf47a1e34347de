use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;

/// Errors emitted when talking to the global Prometheus instance.
#[derive(Debug, Error)]
pub enum PromError {
    /// The request could not be sent or its body could not be decoded.
    #[error("request to prometheus failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Prometheus answered with a non-success status.
    #[error("prometheus returned status {status}")]
    Status { status: u16 },
}

/// Connection facts for one Prometheus call, resolved per request.
#[derive(Debug, Clone)]
pub struct PromTarget {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token presented to Prometheus.
    pub token: SecretString,
    /// Skip TLS certificate verification when true.
    pub insecure: bool,
    /// Per-request timeout in seconds.
    pub timeout_sec: u64,
}

/// Client interface for the Prometheus HTTP API paths the gateway queries.
#[async_trait]
pub trait PromClient: Send + Sync {
    /// GETs an API path with query parameters and returns the decoded body.
    async fn get(
        &self,
        target: &PromTarget,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, PromError>;
}
