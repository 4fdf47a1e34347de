use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;

/// Errors emitted when talking to a cluster's API server.
#[derive(Debug, Error)]
pub enum OcpError {
    /// The request could not be sent or its body could not be decoded.
    #[error("request to cluster api failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API server answered with a non-success status.
    #[error("cluster api returned status {status}")]
    Status { status: u16 },
}

/// Connection facts for calls against one cluster's API server.
#[derive(Debug, Clone)]
pub struct OcpTarget {
    /// Base URL of the API server, without a trailing slash.
    pub api_url: String,
    /// Skip TLS certificate verification when true.
    pub insecure: bool,
    /// Bearer token presented to the API server.
    pub token: SecretString,
}

/// Client interface for the read-only cluster API calls the gateway issues.
#[async_trait]
pub trait OcpClient: Send + Sync {
    /// Lists OpenShift projects (`project.openshift.io/v1`).
    async fn list_projects(&self, target: &OcpTarget) -> Result<Value, OcpError>;

    /// Lists core namespaces.
    async fn list_namespaces(&self, target: &OcpTarget) -> Result<Value, OcpError>;

    /// Lists pods in a namespace.
    async fn list_pods(&self, target: &OcpTarget, namespace: &str) -> Result<Value, OcpError>;

    /// Lists events in a namespace, optionally narrowed by a field selector.
    async fn list_events(
        &self,
        target: &OcpTarget,
        namespace: &str,
        field_selector: Option<&str>,
    ) -> Result<Value, OcpError>;
}
