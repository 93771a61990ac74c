//! printdock-server — shop printer service
//!
//! Long-running service that:
//! - Keeps each shop's printer records (agent-detected + manual override)
//! - Serves the printer REST API for the partner dashboard
//! - Marks printers offline when their agent stops reporting

use printdock_server::{AgentWatchdog, Config, ServerState, create_router, logger};
use tokio_util::sync::CancellationToken;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    logger::init_logger(&config.log_level, config.is_production());

    tracing::info!("Starting printdock-server (env: {})", config.environment);

    let state = ServerState::new(config.clone());
    let shutdown = CancellationToken::new();

    let watchdog = AgentWatchdog::new(
        state.registry.clone(),
        config.agent_offline_after,
        config.watchdog_interval(),
        shutdown.clone(),
    );
    let watchdog_handle = tokio::spawn(watchdog.run());

    let app = create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("printdock-server HTTP listening on {http_addr}");

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
            }
            tracing::info!("Shutdown signal received");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    watchdog_handle.await?;

    Ok(())
}
