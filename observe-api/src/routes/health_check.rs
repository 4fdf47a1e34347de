use actix_web::{Responder, get, web::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

#[utoipa::path(
    summary = "Gateway health status",
    description = "Returns status ok when the gateway is available and responding.",
    responses(
        (status = 200, description = "Health check passed.", body = HealthResponse),
    ),
    tag = "Health",
)]
#[get("/health")]
pub async fn health_check() -> impl Responder {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
