use std::sync::Arc;

use observe_telemetry::tracing::init_test_tracing;
use secrecy::ExposeSecret;
use serde_json::{Value, json};

use crate::support::mocks::{MockOcpClient, MockPromClient};
use crate::support::test_app::{spawn_test_app, spawn_test_app_with_clients};

mod support;

async fn spawn_with_prom(prom: Arc<MockPromClient>) -> crate::support::test_app::TestApp {
    spawn_test_app_with_clients(Arc::new(MockOcpClient::default()), prom).await
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_query_is_rejected_inline() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;
    app.seed_prometheus();

    // Act
    let response = app
        .post_json("/api/observe/promql", &json!({"query": "   "}))
        .await;

    // Assert
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "query is empty");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_url_is_reported_inline() {
    init_test_tracing();
    // Arrange: no override document, no environment override.
    let app = spawn_test_app().await;

    // Act
    let response = app
        .post_json("/api/observe/promql", &json!({"query": "up"}))
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Prometheus URL is not configured"), "{error}");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_token_is_reported_inline() {
    init_test_tracing();
    // Arrange: URL configured but no token file.
    let app = spawn_test_app().await;
    app.write_override_doc("global:\n  prometheus_url: http://prom.example.com:9090\n");

    // Act
    let response = app
        .post_json("/api/observe/promql", &json!({"query": "up"}))
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Prometheus token not found"), "{error}");
}

#[tokio::test(flavor = "multi_thread")]
async fn instant_query_resolves_settings_and_returns_series() {
    init_test_tracing();
    // Arrange
    let prom = Arc::new(MockPromClient::with_response(json!({
        "status": "success",
        "data": {"result": [{"metric": {"__name__": "up"}, "value": [1, "1"]}]}
    })));
    let app = spawn_with_prom(prom.clone()).await;
    app.write_override_doc(
        r#"
global:
  prometheus_url: http://prom.example.com:9090/
  prometheus_insecure: true
  prometheus_timeout_sec: 30
"#,
    );
    app.write_secret("prometheus.token", "prom-token\n");

    // Act
    let response = app
        .post_json(
            "/api/observe/promql",
            &json!({"query": " up ", "time": 1714561200}),
        )
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], true);
    assert_eq!(body["result"].as_array().unwrap().len(), 1);
    assert!(body.get("error").is_none());

    let calls = prom.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/api/v1/query");
    assert_eq!(
        calls[0].params,
        vec![
            ("query".to_string(), "up".to_string()),
            ("time".to_string(), "1714561200".to_string()),
        ]
    );
    // Trailing slash stripped, flags and timeout resolved from the document.
    assert_eq!(calls[0].target.base_url, "http://prom.example.com:9090");
    assert_eq!(calls[0].target.token.expose_secret(), "prom-token");
    assert!(calls[0].target.insecure);
    assert_eq!(calls[0].target.timeout_sec, 30);
}

#[tokio::test(flavor = "multi_thread")]
async fn range_query_passes_window_parameters() {
    init_test_tracing();
    // Arrange
    let prom = Arc::new(MockPromClient::default());
    let app = spawn_with_prom(prom.clone()).await;
    app.seed_prometheus();

    // Act
    let response = app
        .post_json(
            "/api/observe/promql/range",
            &json!({"query": "up", "start": "2025-05-01T10:00:00Z", "end": "2025-05-01T11:00:00Z", "step": "30s"}),
        )
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], true);

    let calls = prom.calls.lock().unwrap();
    assert_eq!(calls[0].path, "/api/v1/query_range");
    assert_eq!(
        calls[0].params,
        vec![
            ("query".to_string(), "up".to_string()),
            ("start".to_string(), "2025-05-01T10:00:00Z".to_string()),
            ("end".to_string(), "2025-05-01T11:00:00Z".to_string()),
            ("step".to_string(), "30s".to_string()),
        ]
    );
    // Defaults apply when the document sets no timeout or TLS flag.
    assert_eq!(calls[0].target.timeout_sec, 20);
    assert!(!calls[0].target.insecure);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_success_status_is_reported_inline() {
    init_test_tracing();
    // Arrange
    let prom = Arc::new(MockPromClient::with_response(json!({
        "status": "error",
        "error": "query timed out",
    })));
    let app = spawn_with_prom(prom).await;
    app.seed_prometheus();

    // Act
    let response = app
        .post_json("/api/observe/promql", &json!({"query": "up"}))
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "query timed out");
    assert_eq!(body["result"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn labels_accept_the_flat_data_shape() {
    init_test_tracing();
    // Arrange: the label endpoints return data as a plain array.
    let prom = Arc::new(MockPromClient::with_response(json!({
        "status": "success",
        "data": ["__name__", "instance", "job"],
    })));
    let app = spawn_with_prom(prom.clone()).await;
    app.seed_prometheus();

    // Act
    let response = app.get("/api/observe/promql/labels").await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], true);
    assert_eq!(body["result"], json!(["__name__", "instance", "job"]));
    assert_eq!(prom.calls.lock().unwrap()[0].path, "/api/v1/labels");
}

#[tokio::test(flavor = "multi_thread")]
async fn label_values_build_the_label_path() {
    init_test_tracing();
    // Arrange
    let prom = Arc::new(MockPromClient::with_response(json!({
        "status": "success",
        "data": ["payments", "logging"],
    })));
    let app = spawn_with_prom(prom.clone()).await;
    app.seed_prometheus();

    // Act
    let response = app
        .get("/api/observe/promql/label-values?label=namespace")
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["ok"], true);
    assert_eq!(
        prom.calls.lock().unwrap()[0].path,
        "/api/v1/label/namespace/values"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn alerts_query_firing_alerts() {
    init_test_tracing();
    // Arrange
    let prom = Arc::new(MockPromClient::default());
    let app = spawn_with_prom(prom.clone()).await;
    app.seed_prometheus();

    // Act
    app.get("/api/observe/alerts").await;

    // Assert
    let calls = prom.calls.lock().unwrap();
    assert_eq!(calls[0].path, "/api/v1/query");
    assert_eq!(
        calls[0].params,
        vec![(
            "query".to_string(),
            r#"ALERTS{alertstate="firing"}"#.to_string()
        )]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn pod_metrics_issue_cpu_and_memory_queries() {
    init_test_tracing();
    // Arrange
    let prom = Arc::new(MockPromClient::default());
    let app = spawn_with_prom(prom.clone()).await;
    app.seed_prometheus();

    // Act
    let response = app
        .get("/api/observe/pod-metrics?pod=api-7d9c&namespace=payments")
        .await;

    // Assert
    let body: Value = response.json().await.expect("failed to deserialize response");
    assert_eq!(body["cpu"]["ok"], true);
    assert_eq!(body["memory"]["ok"], true);

    let calls = prom.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    let cpu_query = &calls[0].params[0].1;
    assert!(cpu_query.contains("container_cpu_usage_seconds_total"));
    assert!(cpu_query.contains(r#"pod="api-7d9c""#));
    assert!(cpu_query.contains(r#"namespace="payments""#));
    assert!(cpu_query.contains("by (container)"));
    let memory_query = &calls[1].params[0].1;
    assert!(memory_query.contains("container_memory_working_set_bytes"));
}
