//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `auth` - Signup, login, logout and session lookup
//! - `upload` - Audio upload relay to object storage
//! - `tts` - Proxy for the remote text-to-speech service
//! - `seedvc` - Proxy for the remote voice conversion service

pub mod api;
pub mod auth;
pub mod seedvc;
pub mod tts;
pub mod upload;

use axum::{Json, extract::rejection::JsonRejection};

use crate::errors::app_error::{AppError, AppResult};

/// Unwrap a JSON body, turning extractor rejections into `{"error": ...}` 400s
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

/// Reject blank required fields before any remote call
pub(crate) fn require_field(name: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("Missing {name}")));
    }
    Ok(())
}
