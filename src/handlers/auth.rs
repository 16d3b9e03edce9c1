use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time::Duration as CookieDuration},
};
use tracing::info;

use super::json_body;
use crate::auth::{Auth, Credentials, SESSION_COOKIE, SignupRequest};
use crate::errors::app_error::AppResult;
use crate::state::AppState;
use crate::store::UserIdentity;

fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age_seconds))
        .build()
}

/// `POST /api/auth/signup`
///
/// Creates the account and answers 201 with the public identity. Does not
/// sign the user in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserIdentity>)> {
    let request = json_body(payload)?;
    let identity = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(identity)))
}

/// `POST /api/auth/login`
///
/// On success sets the session cookie and returns `{user, expires_at}`.
/// Every credential failure gives the same 401 and no cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<Auth>> {
    let credentials = json_body(payload)?;
    let (user, session) = state.auth.login(&credentials).await?;

    cookies.add(session_cookie(
        session.token,
        state.auth.sessions().ttl().whole_seconds(),
        state.config.session_cookie_secure,
    ));

    Ok(Json(Auth {
        user,
        expires_at: session.expires_at,
    }))
}

/// `POST /api/auth/logout`
///
/// Clears the session cookie. Tokens are stateless, so a copied token stays
/// valid until it expires.
pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    if cookies.get(SESSION_COOKIE).is_some() {
        info!("Session cookie cleared");
    }
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    StatusCode::NO_CONTENT
}

/// `GET /api/auth/session` (behind the auth middleware)
pub async fn session(Extension(auth): Extension<Auth>) -> Json<Auth> {
    Json(auth)
}
