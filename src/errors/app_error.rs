use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::clients::ClientError;
use crate::errors::auth_error::AuthError;
use crate::storage::StorageError;
use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

/// Request-level error returned by every handler
///
/// Each variant maps to one HTTP status and a `{"error": "..."}` body. Upstream
/// failures from the remote AI services are the exception: their status and body
/// are passed through unchanged.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input, rejected before touching any store
    #[error("{0}")]
    Validation(String),

    /// Login failed; does not say which part was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    /// Request body over the configured upload ceiling
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Operator-correctable setup problem (missing credentials, base URLs, ...)
    #[error("{0}")]
    Configuration(String),

    /// Remote service answered with a non-success status
    #[error("Upstream service returned {status}")]
    Upstream { status: u16, body: String },

    /// Remote service could not be reached at all
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Object storage write or URL signing failed
    #[error("Upload failed")]
    Storage(#[source] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UserAlreadyExists => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(e) => e.status_code(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            AppError::Upstream { body, .. } => {
                // Pass the remote body through as-is, keeping JSON bodies typed as JSON
                let content_type = if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                    "application/json"
                } else {
                    "text/plain; charset=utf-8"
                };
                (
                    status,
                    [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
                    body,
                )
                    .into_response()
            }
            AppError::Auth(e) => e.into_response(),
            AppError::Storage(ref e) => {
                tracing::error!(error = %e, "Upload relay failed");
                (status, Json(json!({ "error": self.to_string() }))).into_response()
            }
            AppError::Internal(ref detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (status, Json(json!({ "error": self.to_string() }))).into_response()
            }
            other => {
                if status.is_server_error() {
                    tracing::error!(error = %other, "Request failed");
                }
                (status, Json(json!({ "error": other.to_string() }))).into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::UserAlreadyExists,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Upstream { status, body } => AppError::Upstream { status, body },
            ClientError::Request(e) => AppError::UpstreamUnavailable(e.to_string()),
            ClientError::InvalidUrl(e) => AppError::Configuration(e.to_string()),
        }
    }
}
