//! Error types shared by the HTTP surface.
//!
//! - `app_error` - request-level failures (validation, credentials, storage, upstream)
//! - `auth_error` - session token failures raised by the auth middleware

pub mod app_error;
pub mod auth_error;
