//! solar-dashboard - terminal view of FusionSolar production and revenue
//!
//! Logs in through the relay, loads the plant list once, then prints the
//! aggregated totals after every KPI refresh until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::RwLock;

use solar_relay::config::Config;
use solar_relay::dashboard::{render::render, DashboardState, KpiPoller, RelayClient};
use solar_relay::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_tracing();

    let config = Config::load()?.dashboard;
    let user_name = config
        .user_name
        .ok_or_else(|| anyhow!("dashboard.user_name is not configured"))?;
    let system_code = config
        .system_code
        .ok_or_else(|| anyhow!("dashboard.system_code is not configured"))?;

    let client = Arc::new(RelayClient::new(&config.relay_url)?);
    tracing::info!("Using relay at {}", config.relay_url);

    let session = client
        .login(&user_name, &system_code)
        .await
        .map_err(|e| anyhow!("Login failed: {}", e.user_message()))?;

    let plants = client
        .fetch_plants(&session)
        .await
        .map_err(|e| anyhow!("Loading plants failed: {}", e.user_message()))?;
    tracing::info!("Loaded {} plants", plants.len());

    let state = Arc::new(RwLock::new(DashboardState::default()));
    {
        let mut state = state.write().await;
        state.session.login(session);
        state.set_plants(plants);
    }

    let poller = KpiPoller::new(
        client.clone(),
        state.clone(),
        Duration::from_secs(config.poll_interval_secs),
    )
    .spawn();
    let mut updates = poller.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render(&*state.read().await));
            }
        }
    }

    poller.stop().await;

    // Drop the token locally first; the vendor logout is best-effort
    let session = state.write().await.clear();
    if let Some(session) = session {
        if let Err(e) = client.logout(&session).await {
            tracing::warn!("Vendor logout failed: {}", e);
        }
    }

    tracing::info!("Logged out");
    Ok(())
}
