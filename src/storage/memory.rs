use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload, memory::InMemory,
};
use url::Url;

use super::{AudioStorage, StorageError, StorageResult, object_path};
use crate::utils::clock::{Clock, SystemClock};

const EXPIRES_PARAM: &str = "expires";

/// In-process audio storage.
///
/// URLs take the form `memory://{bucket}/{key}?expires={unix_seconds}` and are
/// honoured by [`MemoryAudioStorage::resolve`] only while the clock is before
/// the expiry.
#[derive(Clone)]
pub struct MemoryAudioStorage {
    store: Arc<InMemory>,
    bucket: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MemoryAudioStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAudioStorage")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryAudioStorage {
    fn default() -> Self {
        Self::new("memory", Arc::new(SystemClock))
    }
}

impl MemoryAudioStorage {
    pub fn new(bucket: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: bucket.into(),
            clock,
        }
    }

    /// Fetch the object behind a URL issued by [`AudioStorage::presigned_url`]
    pub async fn resolve(&self, url: &Url) -> StorageResult<Bytes> {
        if url.scheme() != "memory" || url.host_str() != Some(self.bucket.as_str()) {
            return Err(StorageError::InvalidUrl(url.to_string()));
        }

        let expires: i64 = url
            .query_pairs()
            .find(|(k, _)| k == EXPIRES_PARAM)
            .and_then(|(_, v)| v.parse().ok())
            .ok_or_else(|| StorageError::InvalidUrl(url.to_string()))?;

        if self.clock.now().unix_timestamp() >= expires {
            return Err(StorageError::UrlExpired);
        }

        let path = object_path(url.path().trim_start_matches('/'))?;
        let result = self.store.get(&path).await?;
        Ok(result.bytes().await?)
    }

    /// Content type recorded for `key`, if the object exists
    pub async fn content_type(&self, key: &str) -> StorageResult<Option<String>> {
        let path = object_path(key)?;
        let result = self.store.get(&path).await?;
        Ok(result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.as_ref().to_string()))
    }

    /// Every key currently stored
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        let keys = self
            .store
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await?;
        Ok(keys)
    }
}

#[async_trait]
impl AudioStorage for MemoryAudioStorage {
    async fn put_audio(&self, key: &str, bytes: Bytes, content_type: &str) -> StorageResult<()> {
        let path = object_path(key)?;

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&path, PutPayload::from(bytes), options)
            .await?;
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<Url> {
        let path = object_path(key)?;
        let expires = self.clock.now().unix_timestamp() + expires_in.as_secs() as i64;

        let mut url = Url::parse(&format!("memory://{}/{}", self.bucket, path))
            .map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair(EXPIRES_PARAM, &expires.to_string());
        Ok(url)
    }
}
