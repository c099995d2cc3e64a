use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API-facing error taxonomy. Every failure is a typed return value with a
/// stable machine code and a human message; only `Unavailable` is retryable.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable code carried in every error body; clients branch on this, not
    /// on the message text.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Invalid(_) => "invalid",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::AlreadyCancelled(_) => "already_cancelled",
            ApiError::PreconditionFailed(_) => "precondition_failed",
            ApiError::Unavailable(_) => "unavailable",
            ApiError::Auth(_) => "auth",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::AlreadyCancelled(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PreconditionFailed(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::error!("Error: {}: {}", status, message);

        let body = Json(json!({
            "code": self.code(),
            "error": message
        }));

        (status, body).into_response()
    }
}
