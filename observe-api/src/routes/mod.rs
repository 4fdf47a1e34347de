use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod auth;
pub mod clusters;
pub mod health_check;
pub mod metrics;
pub mod promql;
pub mod resources;

/// JSON body returned by failing routes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    #[schema(example = "an error occurred in the gateway")]
    pub error: String,
}
