//! Tracing setup shared by the relay server and the dashboard

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solar_relay=info,solar_dashboard=info,tower_http=debug".into()),
        )
        .init();
}
