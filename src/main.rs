use attendance_form::{AppState, FormConfig, router, spawn_clock_ticker};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = FormConfig::from_env();
    let state = AppState::from_config(&config)?;
    spawn_clock_ticker(state.clone(), config.clock_refresh);

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}, backend at {}", config.api_base);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
