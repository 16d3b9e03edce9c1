use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Failures while authenticating a request with a session token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid authorization header")]
    InvalidAuthHeader,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session expired")]
    TokenExpired,

    #[error("Failed to issue session token: {0}")]
    TokenIssue(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Session token error");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
