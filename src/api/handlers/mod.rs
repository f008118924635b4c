//! HTTP handlers module

mod huawei;

pub use self::huawei::*;

use axum::{extract::State, http::Uri, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};

use crate::error::AppError;
use crate::models::{HealthResponse, TestResponse};
use crate::relay::RelayState;

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /health
pub async fn health_check(State(state): State<RelayState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: now_rfc3339(),
        environment: state.server.environment.clone(),
        port: state.server.port,
    })
}

/// GET /test - connectivity check for the frontend
pub async fn test_backend(State(state): State<RelayState>) -> impl IntoResponse {
    Json(TestResponse {
        message: "Backend is working!".to_string(),
        environment: state.server.environment.clone(),
        timestamp: now_rfc3339(),
    })
}

/// Fallback outside production (no static bundle)
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
