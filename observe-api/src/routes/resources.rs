use std::collections::HashMap;
use std::path::Path;

use actix_web::{
    HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    web::{Data, Json, Query},
};
use observe_config::{ClusterDescriptor, ObserveContext, get_clusters, read_secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use crate::ocp::{OcpClient, OcpError, OcpTarget};
use crate::routes::ErrorMessage;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("cluster {0} is not defined")]
    ClusterNotFound(String),

    #[error("cluster {0} has no API URL configured")]
    ApiUrlMissing(String),

    #[error(transparent)]
    Upstream(#[from] OcpError),
}

impl ResponseError for ResourceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::ClusterNotFound(_) => StatusCode::NOT_FOUND,
            ResourceError::ApiUrlMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            ResourceError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            error: self.to_string(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

/// Looks up a cluster and checks that it is reachable in principle.
fn resolve_cluster(
    ctx: &ObserveContext,
    cluster: &str,
) -> Result<ClusterDescriptor, ResourceError> {
    let mut clusters = get_clusters(ctx);
    let Some(descriptor) = clusters.remove(cluster) else {
        return Err(ResourceError::ClusterNotFound(cluster.to_string()));
    };
    if descriptor.ocp_api.is_empty() {
        return Err(ResourceError::ApiUrlMissing(cluster.to_string()));
    }

    Ok(descriptor)
}

/// Builds the upstream target for a resolved cluster, reading its token
/// from the descriptor's token file.
fn target_for(descriptor: &ClusterDescriptor) -> OcpTarget {
    OcpTarget {
        api_url: descriptor.ocp_api.clone(),
        insecure: descriptor.insecure,
        token: read_secret(Path::new(&descriptor.token_file)),
    }
}

/// Items array of a Kubernetes list response.
fn items(data: &Value) -> &[Value] {
    data.get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// String field of a JSON object, empty when absent.
fn str_field(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NamespacesQuery {
    /// Name of the cluster to query.
    pub cluster: String,
}

#[utoipa::path(
    summary = "List namespaces",
    description = "Returns the sorted OpenShift projects (or plain namespaces) of a cluster.",
    params(NamespacesQuery),
    responses(
        (status = 200, description = "Sorted namespace names", body = Vec<String>),
        (status = 404, description = "Unknown cluster", body = ErrorMessage),
        (status = 502, description = "Upstream failure", body = ErrorMessage),
        (status = 503, description = "Cluster has no API URL", body = ErrorMessage),
    ),
    tag = "Observe",
)]
#[get("/namespaces")]
pub async fn list_namespaces(
    ctx: Data<ObserveContext>,
    ocp: Data<dyn OcpClient>,
    query: Query<NamespacesQuery>,
) -> Result<impl Responder, ResourceError> {
    let descriptor = resolve_cluster(&ctx, &query.cluster)?;
    let target = target_for(&descriptor);

    // OpenShift clusters expose projects; plain Kubernetes only namespaces.
    let data = match ocp.list_projects(&target).await {
        Ok(data) => data,
        Err(_) => ocp.list_namespaces(&target).await?,
    };

    let mut names: Vec<String> = items(&data)
        .iter()
        .filter_map(|item| item.pointer("/metadata/name"))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    names.sort();

    Ok(Json(names))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PodsQuery {
    /// Name of the cluster to query.
    pub cluster: String,
    /// Namespace to list pods from.
    pub namespace: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContainerSummary {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restarts: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    #[schema(example = "Running")]
    pub phase: String,
    /// Status of the pod's `Ready` condition, `False` when unreported.
    pub ready: String,
    pub containers: Vec<ContainerSummary>,
    pub node: String,
    pub created_at: String,
    #[schema(value_type = Object)]
    pub labels: Value,
}

/// Reshapes one pod list item, joining container specs with their statuses.
fn pod_summary(item: &Value) -> PodSummary {
    let metadata = &item["metadata"];
    let spec = &item["spec"];
    let status = &item["status"];

    let ready = status["conditions"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|cond| cond["type"] == "Ready")
        .and_then(|cond| cond["status"].as_str())
        .unwrap_or("False")
        .to_string();

    let container_statuses: HashMap<&str, &Value> = status["containerStatuses"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|cs| cs["name"].as_str().map(|name| (name, cs)))
        .collect();

    let containers = spec["containers"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|container| {
            let name = container["name"].as_str().unwrap_or_default();
            let cs = container_statuses.get(name);
            ContainerSummary {
                name: name.to_string(),
                image: str_field(container, "image"),
                ready: cs.is_some_and(|cs| cs["ready"].as_bool().unwrap_or(false)),
                restarts: cs.map_or(0, |cs| cs["restartCount"].as_i64().unwrap_or(0)),
            }
        })
        .collect();

    let labels = if metadata["labels"].is_object() {
        metadata["labels"].clone()
    } else {
        Value::Object(Default::default())
    };

    PodSummary {
        name: str_field(metadata, "name"),
        namespace: str_field(metadata, "namespace"),
        phase: str_field(status, "phase"),
        ready,
        containers,
        node: str_field(spec, "nodeName"),
        created_at: str_field(metadata, "creationTimestamp"),
        labels,
    }
}

#[utoipa::path(
    summary = "List pods",
    description = "Returns the pods of a namespace with container readiness and restart counts.",
    params(PodsQuery),
    responses(
        (status = 200, description = "Pod summaries", body = Vec<PodSummary>),
        (status = 404, description = "Unknown cluster", body = ErrorMessage),
        (status = 502, description = "Upstream failure", body = ErrorMessage),
        (status = 503, description = "Cluster has no API URL", body = ErrorMessage),
    ),
    tag = "Observe",
)]
#[get("/pods")]
pub async fn list_pods(
    ctx: Data<ObserveContext>,
    ocp: Data<dyn OcpClient>,
    query: Query<PodsQuery>,
) -> Result<impl Responder, ResourceError> {
    let descriptor = resolve_cluster(&ctx, &query.cluster)?;
    let target = target_for(&descriptor);

    let data = ocp.list_pods(&target, &query.namespace).await?;
    let pods: Vec<PodSummary> = items(&data).iter().map(pod_summary).collect();

    Ok(Json(pods))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Name of the cluster to query.
    pub cluster: String,
    /// Namespace to list events from.
    pub namespace: String,
    /// Restrict to events involving this pod.
    pub pod: Option<String>,
    /// Involved object kind used together with `pod`; defaults to `Pod`.
    pub kind: Option<String>,
    /// Restrict to events of this type (`Normal` or `Warning`).
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventSummary {
    #[serde(rename = "type")]
    #[schema(example = "Warning")]
    pub event_type: String,
    #[schema(example = "BackOff")]
    pub reason: String,
    pub message: String,
    pub count: Option<i64>,
    pub first_time: String,
    pub last_time: String,
    /// Name of the involved object.
    pub object: String,
    /// Kind of the involved object.
    pub kind: String,
}

#[utoipa::path(
    summary = "List events",
    description = "Returns the Kubernetes events of a namespace, newest first, optionally filtered by pod or type.",
    params(EventsQuery),
    responses(
        (status = 200, description = "Event summaries", body = Vec<EventSummary>),
        (status = 404, description = "Unknown cluster", body = ErrorMessage),
        (status = 502, description = "Upstream failure", body = ErrorMessage),
        (status = 503, description = "Cluster has no API URL", body = ErrorMessage),
    ),
    tag = "Observe",
)]
#[get("/events")]
pub async fn list_events(
    ctx: Data<ObserveContext>,
    ocp: Data<dyn OcpClient>,
    query: Query<EventsQuery>,
) -> Result<impl Responder, ResourceError> {
    let query = query.into_inner();
    let descriptor = resolve_cluster(&ctx, &query.cluster)?;
    let target = target_for(&descriptor);

    let mut field_parts = Vec::new();
    if let Some(pod) = &query.pod {
        field_parts.push(format!("involvedObject.name={pod}"));
        let kind = query.kind.as_deref().unwrap_or("Pod");
        field_parts.push(format!("involvedObject.kind={kind}"));
    }
    if let Some(event_type) = &query.event_type {
        field_parts.push(format!("type={event_type}"));
    }
    let field_selector = if field_parts.is_empty() {
        None
    } else {
        Some(field_parts.join(","))
    };

    let data = ocp
        .list_events(&target, &query.namespace, field_selector.as_deref())
        .await?;

    let mut events: Vec<EventSummary> = items(&data)
        .iter()
        .map(|item| EventSummary {
            event_type: str_field(item, "type"),
            reason: str_field(item, "reason"),
            message: str_field(item, "message"),
            count: item["count"].as_i64(),
            first_time: str_field(item, "firstTimestamp"),
            last_time: str_field(item, "lastTimestamp"),
            object: item["involvedObject"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            kind: item["involvedObject"]["kind"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        })
        .collect();

    // Newest first; events with no timestamp sort last.
    events.sort_by(|a, b| b.last_time.cmp(&a.last_time));

    Ok(Json(events))
}
