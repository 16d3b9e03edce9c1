pub mod api;
pub mod auth;

use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;

use crate::handlers::api::health_check;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Assemble the application router: public + account + protected routes
///
/// The cookie manager wraps everything so both the login handler and the
/// session middleware see the same cookie jar. Transport concerns (CORS, rate
/// limiting, security headers) are layered on in `main.rs`.
pub fn create_app(state: Arc<AppState>) -> Router {
    // route_layer so unmatched paths still fall through to 404
    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);
    let protected_routes =
        api::create_api_router(state.config.upload_max_bytes).route_layer(auth_layer);

    let public_routes = Router::new().route("/", get(health_check));

    public_routes
        .merge(auth::create_auth_router())
        .merge(protected_routes)
        .with_state(state)
        .layer(CookieManagerLayer::new())
}
