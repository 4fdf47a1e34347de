use actix_web::{
    Responder, get, post,
    web::{Data, Json, Query},
};
use observe_config::{
    ObserveContext, get_global_prometheus_insecure, get_global_prometheus_timeout_sec,
    get_global_prometheus_token, get_global_prometheus_url,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::prom::{PromClient, PromTarget};

/// Response envelope shared by every PromQL-backed route.
///
/// Failures are reported inline with `ok = false` and HTTP 200 so the UI can
/// render the message next to the affected panel instead of handling
/// transport errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub result: Vec<Value>,
}

impl PromResponse {
    fn success(result: Vec<Value>) -> Self {
        Self {
            ok: true,
            error: None,
            result,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            result: Vec::new(),
        }
    }
}

/// Issues one Prometheus HTTP API call with the globally resolved settings.
async fn prom_request(
    ctx: &ObserveContext,
    prom: &dyn PromClient,
    path: &str,
    params: Vec<(String, String)>,
) -> PromResponse {
    let base_url = get_global_prometheus_url(ctx);
    let base_url = base_url.trim_end_matches('/');
    if base_url.is_empty() {
        return PromResponse::failure(
            "Prometheus URL is not configured (set PROMETHEUS_URL or global.prometheus_url in observe.yaml)",
        );
    }

    let token = get_global_prometheus_token(ctx);
    if token.expose_secret().is_empty() {
        return PromResponse::failure(
            "Prometheus token not found, add prometheus.token under the secrets directory",
        );
    }

    let target = PromTarget {
        base_url: base_url.to_string(),
        token,
        insecure: get_global_prometheus_insecure(ctx),
        timeout_sec: get_global_prometheus_timeout_sec(ctx),
    };

    let data = match prom.get(&target, path, &params).await {
        Ok(data) => data,
        Err(e) => return PromResponse::failure(e.to_string()),
    };

    if data["status"] != "success" {
        let error = data["error"]
            .as_str()
            .unwrap_or("Prometheus returned a non-success status")
            .to_string();
        return PromResponse::failure(error);
    }

    // Query endpoints nest the series under data.result; the label endpoints
    // return data as a plain array.
    let result = match &data["data"] {
        Value::Array(values) => values.clone(),
        other => other["result"].as_array().cloned().unwrap_or_default(),
    };

    PromResponse::success(result)
}

/// Renders an optional JSON scalar as a query parameter value.
fn scalar_param(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InstantQueryRequest {
    #[schema(example = "up")]
    pub query: String,
    /// Optional evaluation timestamp (RFC 3339 or unix seconds).
    #[schema(value_type = Option<String>)]
    pub time: Option<Value>,
}

#[utoipa::path(
    summary = "Run an instant PromQL query",
    request_body = InstantQueryRequest,
    responses(
        (status = 200, description = "Query outcome, failures reported inline", body = PromResponse),
    ),
    tag = "PromQL",
)]
#[post("/promql")]
pub async fn run_promql(
    ctx: Data<ObserveContext>,
    prom: Data<dyn PromClient>,
    body: Json<InstantQueryRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let query = body.query.trim();
    if query.is_empty() {
        return Json(PromResponse::failure("query is empty"));
    }

    let mut params = vec![("query".to_string(), query.to_string())];
    if let Some(time) = scalar_param(&body.time) {
        params.push(("time".to_string(), time));
    }

    Json(prom_request(&ctx, prom.get_ref(), "/api/v1/query", params).await)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RangeQueryRequest {
    #[schema(example = "sum(rate(http_requests_total[5m]))")]
    pub query: String,
    #[schema(value_type = Option<String>)]
    pub start: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub end: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub step: Option<Value>,
}

#[utoipa::path(
    summary = "Run a range PromQL query",
    request_body = RangeQueryRequest,
    responses(
        (status = 200, description = "Query outcome, failures reported inline", body = PromResponse),
    ),
    tag = "PromQL",
)]
#[post("/promql/range")]
pub async fn run_promql_range(
    ctx: Data<ObserveContext>,
    prom: Data<dyn PromClient>,
    body: Json<RangeQueryRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let query = body.query.trim();
    if query.is_empty() {
        return Json(PromResponse::failure("query is empty"));
    }

    let mut params = vec![("query".to_string(), query.to_string())];
    for (key, value) in [
        ("start", &body.start),
        ("end", &body.end),
        ("step", &body.step),
    ] {
        if let Some(value) = scalar_param(value) {
            params.push((key.to_string(), value));
        }
    }

    Json(prom_request(&ctx, prom.get_ref(), "/api/v1/query_range", params).await)
}

#[utoipa::path(
    summary = "List label names",
    responses(
        (status = 200, description = "All label names known to Prometheus", body = PromResponse),
    ),
    tag = "PromQL",
)]
#[get("/promql/labels")]
pub async fn list_labels(
    ctx: Data<ObserveContext>,
    prom: Data<dyn PromClient>,
) -> impl Responder {
    Json(prom_request(&ctx, prom.get_ref(), "/api/v1/labels", Vec::new()).await)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LabelValuesQuery {
    /// Label name to list values for.
    pub label: String,
}

#[utoipa::path(
    summary = "List label values",
    params(LabelValuesQuery),
    responses(
        (status = 200, description = "All values of the given label", body = PromResponse),
    ),
    tag = "PromQL",
)]
#[get("/promql/label-values")]
pub async fn list_label_values(
    ctx: Data<ObserveContext>,
    prom: Data<dyn PromClient>,
    query: Query<LabelValuesQuery>,
) -> impl Responder {
    let path = format!("/api/v1/label/{}/values", query.label);
    Json(prom_request(&ctx, prom.get_ref(), &path, Vec::new()).await)
}

#[utoipa::path(
    summary = "List firing alerts",
    responses(
        (status = 200, description = "Currently firing alerts", body = PromResponse),
    ),
    tag = "PromQL",
)]
#[get("/alerts")]
pub async fn list_alerts(
    ctx: Data<ObserveContext>,
    prom: Data<dyn PromClient>,
) -> impl Responder {
    let params = vec![(
        "query".to_string(),
        r#"ALERTS{alertstate="firing"}"#.to_string(),
    )];
    Json(prom_request(&ctx, prom.get_ref(), "/api/v1/query", params).await)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PodMetricsQuery {
    /// Pod to report usage for.
    pub pod: String,
    /// Namespace of the pod.
    pub namespace: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PodMetricsResponse {
    /// Per-container CPU usage (5m rate, cores).
    pub cpu: PromResponse,
    /// Per-container memory working set (bytes).
    pub memory: PromResponse,
}

#[utoipa::path(
    summary = "Per-pod container metrics",
    params(PodMetricsQuery),
    responses(
        (status = 200, description = "CPU and memory usage by container", body = PodMetricsResponse),
    ),
    tag = "PromQL",
)]
#[get("/pod-metrics")]
pub async fn pod_metrics(
    ctx: Data<ObserveContext>,
    prom: Data<dyn PromClient>,
    query: Query<PodMetricsQuery>,
) -> impl Responder {
    let PodMetricsQuery { pod, namespace } = query.into_inner();

    let cpu_query = format!(
        "sum(rate(container_cpu_usage_seconds_total{{\
         pod=\"{pod}\",namespace=\"{namespace}\",\
         container!=\"\",container!=\"POD\"}}[5m])) by (container)"
    );
    let memory_query = format!(
        "sum(container_memory_working_set_bytes{{\
         pod=\"{pod}\",namespace=\"{namespace}\",\
         container!=\"\",container!=\"POD\"}}) by (container)"
    );

    let cpu = prom_request(
        &ctx,
        prom.get_ref(),
        "/api/v1/query",
        vec![("query".to_string(), cpu_query)],
    )
    .await;
    let memory = prom_request(
        &ctx,
        prom.get_ref(),
        "/api/v1/query",
        vec![("query".to_string(), memory_query)],
    )
    .await;

    Json(PodMetricsResponse { cpu, memory })
}
