//! Remote service proxy tests
//!
//! The TTS and voice conversion services are replaced by wiremock servers;
//! requests go through the full router with a signed-in user.

mod common;

use axum::{body::Body, http::StatusCode};
use serde_json::json;
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{body_json as wm_body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{authorized, body_json, body_text, create_state, create_test_config, signed_in};
use voicelab_gateway::routes;

async fn app_with_services(
    dir: &TempDir,
    tts: Option<&MockServer>,
    seedvc: Option<&MockServer>,
) -> (axum::Router, String) {
    let mut config = create_test_config(&dir.path().join("users.json"));
    if let Some(server) = tts {
        config.tts_api_base = Some(server.uri());
        config.tts_auth = Some("tts-token".to_string());
    }
    if let Some(server) = seedvc {
        config.seedvc_api_base = Some(server.uri());
        config.seedvc_auth = Some("Token vc-secret".to_string());
    }
    let (state, _clock) = create_state(config, None);
    let (_, token) = signed_in(&state, "a@x.com").await;
    (routes::create_app(state), token)
}

#[tokio::test]
async fn test_tts_voices_sends_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .and(header("authorization", "Bearer tts-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"voices": ["alice", "bob"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (app, token) = app_with_services(&dir, Some(&server), None).await;

    let response = app
        .oneshot(authorized("GET", "/api/tts/voices", &token, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"voices": ["alice", "bob"]})
    );
}

#[tokio::test]
async fn test_tts_generate_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(wm_body_json(json!({"text": "Hello there", "target_voice": "alice"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audio_url": "https://cdn.example.com/tts/1.wav",
            "s3_key": "tts-outputs/1.wav"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (app, token) = app_with_services(&dir, Some(&server), None).await;

    let mut request = authorized(
        "POST",
        "/api/tts/generate",
        &token,
        Body::from(json!({"text": "Hello there", "target_voice": "alice"}).to_string()),
    );
    request
        .headers_mut()
        .insert("content-type", "application/json".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["s3_key"], "tts-outputs/1.wav");
    assert_eq!(body["audio_url"], "https://cdn.example.com/tts/1.wav");
}

#[tokio::test]
async fn test_blank_text_never_reaches_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (app, token) = app_with_services(&dir, Some(&server), None).await;

    let mut request = authorized(
        "POST",
        "/api/tts/generate",
        &token,
        Body::from(json!({"text": "   ", "target_voice": "alice"}).to_string()),
    );
    request
        .headers_mut()
        .insert("content-type", "application/json".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing text");
}

#[tokio::test]
async fn test_seedvc_convert_passes_upstream_error_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(header("authorization", "Token vc-secret"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "unknown voice"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (app, token) = app_with_services(&dir, None, Some(&server)).await;

    let mut request = authorized(
        "POST",
        "/api/seedvc/convert",
        &token,
        Body::from(
            json!({
                "source_audio_key": "seedvc-audio-uploads/1-a.wav",
                "target_voice": "nobody"
            })
            .to_string(),
        ),
    );
    request
        .headers_mut()
        .insert("content-type", "application/json".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({"detail": "unknown voice"})
    );
}

#[tokio::test]
async fn test_seedvc_voices_plain_text_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (app, token) = app_with_services(&dir, None, Some(&server)).await;

    let response = app
        .oneshot(authorized("GET", "/api/seedvc/voices", &token, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "model loading");
}

#[tokio::test]
async fn test_unreachable_service_is_bad_gateway() {
    // Bind and release a port so nothing is listening on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri = format!("http://127.0.0.1:{port}");

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir.path().join("users.json"));
    config.tts_api_base = Some(uri);
    let (state, _clock) = create_state(config, None);
    let (_, token) = signed_in(&state, "a@x.com").await;
    let app = routes::create_app(state);

    let response = app
        .oneshot(authorized("GET", "/api/tts/voices", &token, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unconfigured_service() {
    let dir = TempDir::new().unwrap();
    let (app, token) = app_with_services(&dir, None, None).await;

    let response = app
        .clone()
        .oneshot(authorized("GET", "/api/tts/voices", &token, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"],
        "TTS service not configured"
    );

    let response = app
        .oneshot(authorized("GET", "/api/seedvc/voices", &token, Body::empty()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_proxy_requires_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"voices": []})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (app, _token) = app_with_services(&dir, Some(&server), None).await;

    let request = axum::http::Request::builder()
        .uri("/api/tts/voices")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
