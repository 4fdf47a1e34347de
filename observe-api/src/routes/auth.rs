use actix_web::{
    Responder, get,
    web::{Data, Json},
};
use observe_config::{ObserveContext, get_auth_status};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Prometheus connection status polled by the UI.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthStatusResponse {
    /// Mirrors `has_token`; older UI builds read this field.
    pub logged_in: bool,
    pub has_token: bool,
    pub has_prom_url: bool,
}

#[utoipa::path(
    summary = "Prometheus auth status",
    description = "Reports whether a global Prometheus token and URL are configured. No upstream call is made.",
    responses(
        (status = 200, description = "Current auth status", body = AuthStatusResponse),
    ),
    tag = "Observe",
)]
#[get("/auth/status")]
pub async fn auth_status(ctx: Data<ObserveContext>) -> impl Responder {
    let status = get_auth_status(&ctx);

    Json(AuthStatusResponse {
        logged_in: status.logged_in,
        has_token: status.has_token,
        has_prom_url: status.has_prom_url,
    })
}
