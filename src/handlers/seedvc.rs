use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{json_body, require_field};
use crate::clients::{ConvertVoiceRequest, GeneratedAudio, VoiceConversionClient, VoicesResponse};
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

fn client(state: &AppState) -> AppResult<&VoiceConversionClient> {
    state
        .voice_conversion_client
        .as_ref()
        .ok_or_else(|| AppError::configuration("Voice conversion service not configured"))
}

/// `GET /api/seedvc/voices`
pub async fn list_voices(State(state): State<Arc<AppState>>) -> AppResult<Json<VoicesResponse>> {
    let voices = client(&state)?.list_voices().await?;
    Ok(Json(voices))
}

/// `POST /api/seedvc/convert`
///
/// `source_audio_key` is the `s3_key` returned by the upload relay.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertVoiceRequest>, JsonRejection>,
) -> AppResult<Json<GeneratedAudio>> {
    let request = json_body(payload)?;
    require_field("source_audio_key", &request.source_audio_key)?;
    require_field("target_voice", &request.target_voice)?;

    let audio = client(&state)?.convert(&request).await?;
    tracing::info!(s3_key = %audio.s3_key, "Voice converted");
    Ok(Json(audio))
}
