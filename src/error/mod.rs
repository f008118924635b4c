//! Error handling module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream answered with a non-2xx status; the status is relayed as-is
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{message}: {details}")]
    Internal { message: String, details: String },
}

impl AppError {
    pub fn internal(details: impl ToString) -> Self {
        AppError::Internal {
            message: "Internal server error".to_string(),
            details: details.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::NotFound(path) => serde_json::json!({
                "success": false,
                "error": format!("Not found: {}", path),
            }),
            AppError::BadRequest(message) | AppError::Upstream { message, .. } => {
                serde_json::json!({
                    "success": false,
                    "error": message,
                })
            }
            AppError::Internal { message, details } => serde_json::json!({
                "success": false,
                "error": message,
                "details": details,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_relayed() {
        let err = AppError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "Huawei API error: 503 Service Unavailable".to_string(),
        };
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("/x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::internal("connection refused").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
