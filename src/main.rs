use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dosetrack::api::server::start_api_server;
use dosetrack::config;
use dosetrack::core_state::CoreState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{} starting", config::APP_NAME, config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir())?;

    let core = Arc::new(CoreState::new());
    // Opening once at startup runs any pending migrations.
    drop(core.open_db()?);

    let addr: SocketAddr = std::env::var("DOSETRACK_ADDR")
        .unwrap_or_else(|_| config::DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    let mut server = start_api_server(core, addr).await?;
    tracing::info!(addr = %server.addr, "listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.shutdown();

    Ok(())
}
