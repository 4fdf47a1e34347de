use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{App, HttpServer, dev::Server, web};
use observe_config::ObserveContext;
use observe_telemetry::metrics::init_metrics_handle;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::ApiConfig,
    metrics::register_metrics,
    ocp::{HttpOcpClient, OcpClient},
    prom::{HttpPromClient, PromClient},
    routes::{
        ErrorMessage,
        auth::{AuthStatusResponse, auth_status},
        clusters::{ClusterResponse, list_clusters},
        health_check::{HealthResponse, health_check},
        metrics::metrics,
        promql::{
            InstantQueryRequest, PodMetricsResponse, PromResponse, RangeQueryRequest, list_alerts,
            list_label_values, list_labels, pod_metrics, run_promql, run_promql_range,
        },
        resources::{ContainerSummary, EventSummary, PodSummary, list_events, list_namespaces, list_pods},
    },
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Binds the listener and assembles the server with live upstream
    /// clients.
    pub async fn build(config: ApiConfig, ctx: ObserveContext) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let ocp_client = Arc::new(HttpOcpClient::new()?) as Arc<dyn OcpClient>;
        let prom_client = Arc::new(HttpPromClient::new()?) as Arc<dyn PromClient>;

        let server = run(config, ctx, listener, ocp_client, prom_client)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health_check::health_check,
        crate::routes::metrics::metrics,
        crate::routes::clusters::list_clusters,
        crate::routes::auth::auth_status,
        crate::routes::resources::list_namespaces,
        crate::routes::resources::list_pods,
        crate::routes::resources::list_events,
        crate::routes::promql::run_promql,
        crate::routes::promql::run_promql_range,
        crate::routes::promql::list_labels,
        crate::routes::promql::list_label_values,
        crate::routes::promql::list_alerts,
        crate::routes::promql::pod_metrics,
    ),
    components(schemas(
        HealthResponse,
        ClusterResponse,
        AuthStatusResponse,
        PodSummary,
        ContainerSummary,
        EventSummary,
        PromResponse,
        InstantQueryRequest,
        RangeQueryRequest,
        PodMetricsResponse,
        ErrorMessage,
    ))
)]
struct ApiDoc;

/// Assembles the server on an already-bound listener.
///
/// The upstream clients are passed in so tests can substitute mocks for the
/// HTTP implementations.
pub fn run(
    config: ApiConfig,
    ctx: ObserveContext,
    listener: TcpListener,
    ocp_client: Arc<dyn OcpClient>,
    prom_client: Arc<dyn PromClient>,
) -> Result<Server, anyhow::Error> {
    register_metrics();
    let metrics_handle = init_metrics_handle()?;

    let ctx = web::Data::new(ctx);
    let ocp_client: web::Data<dyn OcpClient> = web::Data::from(ocp_client);
    let prom_client: web::Data<dyn PromClient> = web::Data::from(prom_client);
    let cors_allowed_origins = config.cors_allowed_origins.clone();

    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(build_cors(&cors_allowed_origins))
            .service(metrics)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/api")
                    .service(health_check)
                    .service(
                        web::scope("/observe")
                            .service(list_clusters)
                            .service(auth_status)
                            .service(list_namespaces)
                            .service(list_pods)
                            .service(list_events)
                            .service(run_promql)
                            .service(run_promql_range)
                            .service(list_labels)
                            .service(list_label_values)
                            .service(list_alerts)
                            .service(pod_metrics),
                    ),
            )
            .app_data(ctx.clone())
            .app_data(ocp_client.clone())
            .app_data(prom_client.clone())
            .app_data(web::ThinData(metrics_handle.clone()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Builds the CORS layer from the configured origins.
fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.iter().any(|origin| origin == "*") {
        // The UI is served from arbitrary hosts in development.
        return Cors::permissive();
    }

    let mut cors = Cors::default().allow_any_method().allow_any_header();
    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
