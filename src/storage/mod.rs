//! Object storage for uploaded audio.
//!
//! The upload relay only needs two things from storage: write an object with
//! its content type, and hand out a time-limited GET URL for it. Both
//! backends implement [`AudioStorage`]:
//!
//! - [`S3AudioStorage`] - S3-compatible storage through `object_store`, with
//!   URLs presigned by the store's own signer
//! - [`MemoryAudioStorage`] - in-process storage whose URLs expire according to
//!   an injected [`Clock`](crate::utils::clock::Clock)

mod keys;
mod memory;
mod s3;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use url::Url;

pub use keys::{DEFAULT_UPLOAD_PREFIX, build_upload_key, is_audio_content_type, sanitize_filename};
pub use memory::MemoryAudioStorage;
pub use s3::{S3AudioStorage, S3Settings};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object storage error: {0}")]
    Store(#[from] object_store::Error),

    #[error("Invalid object key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },

    #[error("Invalid retrieval URL: {0}")]
    InvalidUrl(String),

    #[error("Retrieval URL has expired")]
    UrlExpired,
}

#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Write `bytes` under `key`, tagged with `content_type`
    async fn put_audio(&self, key: &str, bytes: Bytes, content_type: &str) -> StorageResult<()>;

    /// GET URL for `key` that stops working after `expires_in`
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<Url>;
}

pub(crate) fn object_path(key: &str) -> StorageResult<object_store::path::Path> {
    object_store::path::Path::parse(key).map_err(|source| StorageError::InvalidKey {
        key: key.to_string(),
        source,
    })
}
