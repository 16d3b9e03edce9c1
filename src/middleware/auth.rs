use crate::auth::{Auth, SESSION_COOKIE};
use crate::errors::auth_error::AuthError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tower_cookies::Cookies;

/// Extract the session token from a request
///
/// Token sources, in order:
/// 1. Authorization header: `Authorization: Bearer <token>`
/// 2. The session cookie set by login
///
/// A non-Bearer `Authorization` header (e.g. Basic auth added by a proxy) does
/// not hide the cookie; it only matters when there is no cookie either.
fn extract_token(request: &Request) -> Result<String, AuthError> {
    let auth_header = request.headers().get(AUTHORIZATION);

    if let Some(token) = auth_header
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        tracing::debug!("Token extracted from Authorization header");
        return Ok(token.trim().to_string());
    }

    if let Some(cookie) = request
        .extensions()
        .get::<Cookies>()
        .and_then(|cookies| cookies.get(SESSION_COOKIE))
    {
        tracing::debug!("Token extracted from session cookie");
        return Ok(cookie.value().to_string());
    }

    match auth_header {
        Some(_) => Err(AuthError::InvalidAuthHeader),
        None => Err(AuthError::MissingToken),
    }
}

/// Rejection for protected routes: the auth error plus where to sign in
fn unauthorized(error: AuthError, sign_in: &str) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        return error.into_response();
    }
    (
        status,
        Json(json!({
            "error": error.to_string(),
            "sign_in": sign_in,
        })),
    )
        .into_response()
}

/// Session middleware for protected routes
///
/// Verifies the session token and inserts an [`Auth`] extension for the
/// handler. Requests without a valid, unexpired session get a 401 whose body
/// names the sign-in page.
///
/// Must run inside `CookieManagerLayer` so the cookie jar is available.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_method = request.method().to_string();
    let request_path = request.uri().path().to_string();

    let verified =
        extract_token(&request).and_then(|token| state.auth.sessions().verify(&token));
    let claims = match verified {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!(
                method = %request_method,
                path = %request_path,
                reason = %e,
                "Rejected unauthenticated request"
            );
            return unauthorized(e, &state.config.sign_in_path);
        }
    };

    tracing::debug!(
        method = %request_method,
        path = %request_path,
        user_id = %claims.sub,
        "Session verified"
    );
    request.extensions_mut().insert(Auth::from_claims(&claims));
    next.run(request).await
}
