use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::metrics::OBSERVE_UPSTREAM_REQUESTS_TOTAL;

use super::{OcpClient, OcpError, OcpTarget};

/// Timeout applied to every cluster API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// [`OcpClient`] backed by [`reqwest`].
///
/// One client is pre-built per TLS policy; the per-cluster `insecure` flag
/// picks which one a call goes through.
pub struct HttpOcpClient {
    verifying: Client,
    insecure: Client,
}

impl HttpOcpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            verifying: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            insecure: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .danger_accept_invalid_certs(true)
                .build()?,
        })
    }

    async fn get_json(
        &self,
        target: &OcpTarget,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, OcpError> {
        metrics::counter!(OBSERVE_UPSTREAM_REQUESTS_TOTAL, "upstream" => "ocp").increment(1);

        let client = if target.insecure {
            &self.insecure
        } else {
            &self.verifying
        };

        let response = client
            .get(format!("{}{}", target.api_url, path))
            .bearer_auth(target.token.expose_secret())
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcpError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl OcpClient for HttpOcpClient {
    async fn list_projects(&self, target: &OcpTarget) -> Result<Value, OcpError> {
        self.get_json(target, "/apis/project.openshift.io/v1/projects", &[])
            .await
    }

    async fn list_namespaces(&self, target: &OcpTarget) -> Result<Value, OcpError> {
        self.get_json(target, "/api/v1/namespaces", &[]).await
    }

    async fn list_pods(&self, target: &OcpTarget, namespace: &str) -> Result<Value, OcpError> {
        self.get_json(target, &format!("/api/v1/namespaces/{namespace}/pods"), &[])
            .await
    }

    async fn list_events(
        &self,
        target: &OcpTarget,
        namespace: &str,
        field_selector: Option<&str>,
    ) -> Result<Value, OcpError> {
        let mut query = Vec::new();
        if let Some(selector) = field_selector {
            query.push(("fieldSelector", selector));
        }

        self.get_json(
            target,
            &format!("/api/v1/namespaces/{namespace}/events"),
            &query,
        )
        .await
    }
}
