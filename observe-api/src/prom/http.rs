use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::metrics::OBSERVE_UPSTREAM_REQUESTS_TOTAL;

use super::{PromClient, PromError, PromTarget};

/// [`PromClient`] backed by [`reqwest`].
///
/// One client is pre-built per TLS policy; the timeout comes from the
/// resolved target because operators tune it per deployment.
pub struct HttpPromClient {
    verifying: Client,
    insecure: Client,
}

impl HttpPromClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            verifying: Client::builder().build()?,
            insecure: Client::builder()
                .danger_accept_invalid_certs(true)
                .build()?,
        })
    }
}

#[async_trait]
impl PromClient for HttpPromClient {
    async fn get(
        &self,
        target: &PromTarget,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value, PromError> {
        metrics::counter!(OBSERVE_UPSTREAM_REQUESTS_TOTAL, "upstream" => "prometheus")
            .increment(1);

        let client = if target.insecure {
            &self.insecure
        } else {
            &self.verifying
        };

        let response = client
            .get(format!("{}{}", target.base_url, path))
            .bearer_auth(target.token.expose_secret())
            .query(params)
            .timeout(Duration::from_secs(target.timeout_sec))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PromError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
