#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use observe_api::config::{ApiConfig, ApplicationSettings};
use observe_api::ocp::OcpClient;
use observe_api::prom::PromClient;
use observe_api::startup::run;
use observe_config::ObserveContext;
use tempfile::TempDir;

use crate::support::mocks::{MockOcpClient, MockPromClient};

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    /// Roots of the temporary config/secrets tree; removed on drop.
    pub config_dir: TempDir,
    pub secrets_dir: TempDir,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.api_client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await
            .expect("failed to execute request")
    }

    /// Writes a generated check-definition file.
    pub fn write_generated(&self, file_name: &str, content: &str) {
        let dir = self.config_dir.path().join("generated");
        std::fs::create_dir_all(&dir).expect("failed to create generated dir");
        std::fs::write(dir.join(file_name), content).expect("failed to write generated file");
    }

    /// Writes the override document.
    pub fn write_override_doc(&self, content: &str) {
        std::fs::write(self.config_dir.path().join("observe.yaml"), content)
            .expect("failed to write override document");
    }

    /// Writes a secret file under the secrets directory.
    pub fn write_secret(&self, file_name: &str, content: &str) {
        std::fs::write(self.secrets_dir.path().join(file_name), content)
            .expect("failed to write secret file");
    }

    /// Defines a reachable cluster via the override document and writes its
    /// API token.
    pub fn seed_cluster(&self, name: &str) {
        self.write_override_doc(&format!(
            "clusters:\n  {name}:\n    ocp_api: https://api.{name}.example.com:6443\n"
        ));
        self.write_secret(&format!("{name}.token"), "test-token");
    }

    /// Points the override document at a Prometheus URL and writes the
    /// global token, the minimum for PromQL routes to go upstream.
    pub fn seed_prometheus(&self) {
        self.write_override_doc("global:\n  prometheus_url: http://prom.example.com:9090/\n");
        self.write_secret("prometheus.token", "prom-token\n");
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_test_app_with_clients(
        Arc::new(MockOcpClient::default()),
        Arc::new(MockPromClient::default()),
    )
    .await
}

pub async fn spawn_test_app_with_clients(
    ocp_client: Arc<dyn OcpClient>,
    prom_client: Arc<dyn PromClient>,
) -> TestApp {
    let base_address = "127.0.0.1";
    let listener =
        TcpListener::bind(format!("{base_address}:0")).expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let config_dir = TempDir::new().expect("failed to create config dir");
    let secrets_dir = TempDir::new().expect("failed to create secrets dir");
    let ctx = ObserveContext::new(config_dir.path(), secrets_dir.path());

    let config = ApiConfig {
        application: ApplicationSettings {
            host: base_address.to_string(),
            port,
        },
        cors_allowed_origins: vec!["*".to_string()],
    };

    let server = run(config, ctx, listener, ocp_client, prom_client)
        .expect("failed to build test server");
    tokio::spawn(server);

    TestApp {
        address: format!("http://{base_address}:{port}"),
        api_client: reqwest::Client::new(),
        config_dir,
        secrets_dir,
    }
}
