//! API module - HTTP handlers and routes

pub mod handlers;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::relay::RelayState;

pub fn routes() -> Router<RelayState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/test", get(handlers::test_backend))
        // Vendor relay
        .route("/api/huawei/login", post(handlers::huawei_login))
        .route("/api/huawei/:endpoint", post(handlers::huawei_relay))
}

/// Full application: API routes, static bundle fallback in production, tracing and CORS
pub fn app(state: RelayState) -> Router {
    let router = routes();

    let router = match state.server.static_dir.as_deref() {
        Some(dir) if state.server.is_production() => {
            let index = Path::new(dir).join("index.html");
            tracing::info!("Serving static assets from {}", dir);
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        _ => router.fallback(handlers::not_found),
    };

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ServerConfig, VendorConfig};

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_production_serves_bundle_and_index_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('solar');").unwrap();

        let server = ServerConfig {
            environment: "production".to_string(),
            static_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..ServerConfig::default()
        };
        let state = RelayState::new(server, &VendorConfig::default()).unwrap();
        let app = app(state);

        let (status, body) = get(app.clone(), "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log('solar');");

        let (status, body) = get(app.clone(), "/plants/NE=1/details").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>dashboard</html>");

        let (status, body) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["status"], "OK");
        assert_eq!(health["environment"], "production");
    }

    #[tokio::test]
    async fn test_static_dir_ignored_outside_production() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();

        let server = ServerConfig {
            static_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..ServerConfig::default()
        };
        let state = RelayState::new(server, &VendorConfig::default()).unwrap();

        let (status, body) = get(app(state), "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["success"], false);
    }
}
