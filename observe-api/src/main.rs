use observe_api::{config::ApiConfig, startup::Application};
use observe_config::{ObserveContext, load_config};
use observe_telemetry::tracing::init_tracing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Initialize tracing from the binary name.
    let _log_flusher = init_tracing(env!("CARGO_BIN_NAME"))?;

    actix_web::rt::System::new().block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    let config = load_config::<ApiConfig>()?;
    let ctx = ObserveContext::from_env();

    info!(
        host = %config.application.host,
        port = config.application.port,
        "starting observe gateway"
    );

    let application = Application::build(config, ctx).await?;
    application.run_until_stopped().await?;

    Ok(())
}
