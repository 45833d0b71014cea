use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid or missing session credential")]
    Unauthorized,

    #[error("missing authorization code")]
    MissingCode,

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "invalid_session",
                "invalid or missing session credential".to_string(),
            ),
            AppError::MissingCode => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "missing_code",
                "missing authorization code".to_string(),
            ),
            AppError::Upstream(e) => {
                // Upstream detail stays in the logs; callers get a generic
                // message with no hint of which fetch failed.
                tracing::warn!("Upstream error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_error",
                    "fetch_failed",
                    "fetch error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
