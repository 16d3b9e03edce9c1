use axum::{
    Extension, Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::Auth;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::{build_upload_key, is_audio_content_type};

/// Multipart field carrying the audio
const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub s3_key: String,
    /// Time-limited GET URL for the stored object
    pub url: String,
}

/// The `file` part of an upload form
struct FilePart {
    file_name: String,
    content_type: String,
    data: Bytes,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::validation(err.body_text())
    }
}

/// Read parts until the `file` field; anything else is skipped
async fn read_file_part(multipart: &mut Multipart) -> AppResult<Option<FilePart>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(Some(FilePart {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}

/// `POST /api/upload`
///
/// Stores one audio file under `{prefix}/{unix_millis}-{sanitized_name}` and
/// returns the key plus a presigned GET URL.
///
/// Checks run in order and stop at the first failure:
/// 1. no `file` field: 400 "No file provided"
/// 2. declared type not `audio/*`: 400 "File must be an audio file"
/// 3. storage not configured: 500 "AWS credentials not configured"
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<Auth>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let file = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| AppError::validation("No file provided"))?;

    if !is_audio_content_type(&file.content_type) {
        info!(
            user_id = %auth.user_id(),
            content_type = %file.content_type,
            "Rejected non-audio upload"
        );
        return Err(AppError::validation("File must be an audio file"));
    }

    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::configuration("AWS credentials not configured"))?;

    let key = build_upload_key(
        &state.config.upload_prefix,
        state.clock.now_millis(),
        &file.file_name,
    );
    let size = file.data.len();

    storage
        .put_audio(&key, file.data, &file.content_type)
        .await?;
    let url = storage
        .presigned_url(&key, state.config.upload_url_expiry())
        .await?;

    info!(
        user_id = %auth.user_id(),
        key = %key,
        size,
        "Audio uploaded"
    );

    Ok(Json(UploadResponse {
        s3_key: key,
        url: url.to_string(),
    }))
}
