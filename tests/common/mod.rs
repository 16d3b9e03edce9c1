//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use serde_json::Value;

use voicelab_gateway::{
    ServerConfig, auth::SignupRequest, state::AppState, storage::AudioStorage, store::UserIdentity,
    utils::clock::ManualClock,
};

pub const SESSION_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// 2023-11-14T22:13:20Z
pub const START_UNIX: i64 = 1_700_000_000;

/// Minimal configuration with every optional service switched off
pub fn create_test_config(users_file: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        users_file: users_file.to_path_buf(),
        session_secret: Some(SESSION_SECRET.to_string()),
        session_ttl_seconds: 86_400,
        session_cookie_secure: false,
        sign_in_path: "/auth".to_string(),
        aws_access_key_id: None,
        aws_secret_access_key: None,
        aws_region: "us-east-1".to_string(),
        s3_bucket: None,
        s3_endpoint: None,
        upload_prefix: "seedvc-audio-uploads".to_string(),
        upload_url_expiry_seconds: 3_600,
        upload_max_bytes: None,
        tts_api_base: None,
        tts_auth: None,
        seedvc_api_base: None,
        seedvc_auth: None,
        cors_allowed_origins: None,
        rate_limit_requests_per_second: 60,
        rate_limit_burst_size: 10,
    }
}

/// State on a manual clock so expiry windows can be crossed instantly
pub fn create_state(
    config: ServerConfig,
    storage: Option<Arc<dyn AudioStorage>>,
) -> (Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_unix(START_UNIX));
    let state = AppState::with_parts(config, clock.clone(), storage).unwrap();
    (state, clock)
}

/// Register a user directly through the auth service and return a bearer token
pub async fn signed_in(state: &AppState, email: &str) -> (UserIdentity, String) {
    let identity = state
        .auth
        .signup(SignupRequest {
            email: Some(email.to_string()),
            password: Some("secret1".to_string()),
            name: None,
        })
        .await
        .unwrap();
    let session = state.auth.sessions().issue(&identity).unwrap();
    (identity, session.token)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authorized(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(body)
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub const BOUNDARY: &str = "voicelab-test-boundary";

/// One part of a multipart/form-data body
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(token: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}
