//! FusionSolar relay handlers
//!
//! Login captures the vendor session token from response headers and hands it
//! to the caller in the body. Every other endpoint is forwarded with the
//! caller-supplied token attached as the `XSRF-TOKEN` header.

use std::sync::OnceLock;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use regex::Regex;
use serde_json::Value;

use crate::error::AppError;
use crate::models::LoginRequest;
use crate::relay::RelayState;

/// Endpoint that may only be called with a non-empty `stationCodes`
const STATION_REAL_KPI: &str = "getStationRealKpi";

fn endpoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("endpoint pattern is a valid regex")
    })
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/huawei/login
pub async fn huawei_login(
    State(state): State<RelayState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // An unreadable body counts as missing credentials
    let req = body.map(|Json(req)| req).unwrap_or_else(|rejection| {
        tracing::debug!("Unreadable login body: {}", rejection);
        LoginRequest::default()
    });

    let (Some(user_name), Some(system_code)) =
        (non_blank(req.user_name), non_blank(req.system_code))
    else {
        return Err(AppError::BadRequest(
            "userName and systemCode are required".to_string(),
        ));
    };

    let reply = state.vendor.login(&user_name, &system_code).await?;

    let mut body = reply.body;
    if let (Some(token), Value::Object(map)) = (reply.xsrf_token, &mut body) {
        map.insert("xsrfToken".to_string(), Value::String(token));
    }

    tracing::info!("Vendor login relayed for user {}", user_name);
    Ok(Json(body))
}

/// POST /api/huawei/:endpoint
pub async fn huawei_relay(
    State(state): State<RelayState>,
    Path(endpoint): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    if !endpoint_pattern().is_match(&endpoint) {
        return Err(AppError::BadRequest("Invalid endpoint name".to_string()));
    }

    // Without a readable body there is no token to forward
    let body = body.map(|Json(body)| body).unwrap_or_else(|rejection| {
        tracing::debug!("Unreadable body for {}: {}", endpoint, rejection);
        Value::Object(Default::default())
    });

    let Value::Object(mut payload) = body else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let token = match payload.remove("xsrfToken") {
        Some(Value::String(token)) if !token.trim().is_empty() => token,
        _ => return Err(AppError::BadRequest("xsrfToken is required".to_string())),
    };

    if endpoint == STATION_REAL_KPI && is_blank(payload.get("stationCodes")) {
        return Err(AppError::BadRequest(format!(
            "stationCodes is required for {}",
            STATION_REAL_KPI
        )));
    }

    let upstream = state.vendor.call(&endpoint, &token, &payload).await?;
    Ok(Json(upstream))
}
