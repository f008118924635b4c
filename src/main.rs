//! solar-relay - FusionSolar API relay server
//!
//! Proxies the vendor's JSON endpoints for the browser dashboard, working
//! around CORS and attaching the vendor session token to each call.

use std::net::SocketAddr;

use solar_relay::{api, config, observability, relay::RelayState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_tracing();

    tracing::info!("Starting solar-relay...");

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!(
        "Configuration loaded (environment: {}, vendor: {})",
        config.server.environment,
        config.vendor.base_url
    );

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = RelayState::new(config.server, &config.vendor)?;
    let app = api::app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("solar-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
