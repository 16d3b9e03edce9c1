use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::auth;
use crate::state::AppState;
use std::sync::Arc;

/// Public account routes: no session required
pub fn create_auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .layer(TraceLayer::new_for_http())
}
