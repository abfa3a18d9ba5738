//! Structured error responses shared by every HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Error body every endpoint returns.
///
/// Clients can rely on the shape being the same whether the failure came
/// from routing, validation, or a handler.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable identifier clients match on (e.g. "NotFound")
    pub error: String,
    /// Prose for humans and logs
    pub message: String,
    /// Extra structure when one line is not enough, such as per-field
    /// validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error handlers bubble up to the HTTP boundary.
///
/// Domain error enums convert into this, keeping status codes and the
/// response body shape in one place.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::BadRequest(msg) => {
                tracing::info!("Rejecting request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!("Lookup missed: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    msg,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
            details: None,
        });

        (status, body).into_response()
    }
}

/// Router fallback, so unknown paths share the error shape.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse {
        error: "NotFound".to_string(),
        message: "No resource at this path".to_string(),
        details: None,
    });

    (StatusCode::NOT_FOUND, body).into_response()
}
