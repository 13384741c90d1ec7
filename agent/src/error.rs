//! Error handling for the interceptor's HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Interceptor error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storefront unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Upstream(e) => {
                tracing::error!("Storefront request failed: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Storefront unreachable".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
