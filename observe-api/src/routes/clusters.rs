use actix_web::{
    Responder, get,
    web::{Data, Json},
};
use observe_config::{ObserveContext, get_clusters};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One managed cluster as presented to the UI.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClusterResponse {
    #[schema(example = "prod-eu1")]
    pub name: String,
    #[schema(example = "https://api.prod-eu1.example.com:6443")]
    pub ocp_api: String,
    pub insecure: bool,
    #[schema(example = "https://prometheus.prod-eu1.example.com")]
    pub prometheus_url: String,
    pub loki_url: String,
    pub loki_available: bool,
    pub prometheus_available: bool,
}

#[utoipa::path(
    summary = "List managed clusters",
    description = "Returns every cluster known from the generated checks and the override document.",
    responses(
        (status = 200, description = "All defined clusters", body = Vec<ClusterResponse>),
    ),
    tag = "Observe",
)]
#[get("/clusters")]
pub async fn list_clusters(ctx: Data<ObserveContext>) -> impl Responder {
    let clusters = get_clusters(&ctx);

    let response: Vec<ClusterResponse> = clusters
        .into_values()
        .map(|cluster| {
            let prometheus_url = cluster.prometheus_url();
            ClusterResponse {
                loki_available: !cluster.loki_url.is_empty(),
                prometheus_available: !prometheus_url.is_empty(),
                name: cluster.name,
                ocp_api: cluster.ocp_api,
                insecure: cluster.insecure,
                prometheus_url,
                loki_url: cluster.loki_url,
            }
        })
        .collect();

    Json(response)
}
