use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{json_body, require_field};
use crate::clients::{GenerateSpeechRequest, GeneratedAudio, TtsClient, VoicesResponse};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

fn client(state: &AppState) -> AppResult<&TtsClient> {
    state
        .tts_client
        .as_ref()
        .ok_or_else(|| AppError::configuration("TTS service not configured"))
}

/// `GET /api/tts/voices`
pub async fn list_voices(State(state): State<Arc<AppState>>) -> AppResult<Json<VoicesResponse>> {
    let voices = client(&state)?.list_voices().await?;
    Ok(Json(voices))
}

/// `POST /api/tts/generate`
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateSpeechRequest>, JsonRejection>,
) -> AppResult<Json<GeneratedAudio>> {
    let request = json_body(payload)?;
    require_field("text", &request.text)?;
    require_field("target_voice", &request.target_voice)?;

    let audio = client(&state)?.generate(&request).await?;
    tracing::info!(s3_key = %audio.s3_key, "Speech generated");
    Ok(Json(audio))
}
