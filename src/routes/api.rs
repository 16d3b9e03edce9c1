use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, seedvc, tts, upload};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router with protected routes
///
/// `upload_limit` caps the upload body; `None` lifts axum's default limit
/// entirely.
///
/// Note: the session middleware is applied by the caller once state is available
pub fn create_api_router(upload_limit: Option<usize>) -> Router<Arc<AppState>> {
    let body_limit = match upload_limit {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/api/auth/session", get(auth::session))
        .route("/api/upload", post(upload::upload_audio).layer(body_limit))
        .route("/api/tts/voices", get(tts::list_voices))
        .route("/api/tts/generate", post(tts::generate))
        .route("/api/seedvc/voices", get(seedvc::list_voices))
        .route("/api/seedvc/convert", post(seedvc::convert))
        .layer(TraceLayer::new_for_http())
}
