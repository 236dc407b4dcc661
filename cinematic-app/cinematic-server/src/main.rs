use std::net::SocketAddr;

use tracing::{error, info, warn};

use cinematic_api::{build_router, AppState};
use cinematic_shared::{config::AppConfig, telemetry::init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    init_telemetry("info,cinematic_server=debug,cinematic_api=debug,tower_http=info")?;

    info!("Cinematic server starting...");

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        env = %config.app.env,
        pipeline = %config.pipeline.base_url,
        static_dir = %config.app.static_dir,
        "Configuration loaded"
    );

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
