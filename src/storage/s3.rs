use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload,
    aws::{AmazonS3, AmazonS3Builder},
    signer::Signer,
};
use tracing::{debug, info};
use url::Url;

use super::{AudioStorage, StorageResult, object_path};

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...)
    pub endpoint: Option<String>,
}

/// Audio storage on S3 with presigned GET URLs
#[derive(Debug, Clone)]
pub struct S3AudioStorage {
    store: Arc<AmazonS3>,
    bucket: String,
}

impl S3AudioStorage {
    pub fn new(settings: &S3Settings) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&settings.bucket)
            .with_region(&settings.region)
            .with_access_key_id(&settings.access_key_id)
            .with_secret_access_key(&settings.secret_access_key);

        if let Some(endpoint) = &settings.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        let store = builder.build()?;
        info!(
            bucket = %settings.bucket,
            region = %settings.region,
            "Upload storage configured"
        );

        Ok(Self {
            store: Arc::new(store),
            bucket: settings.bucket.clone(),
        })
    }
}

#[async_trait]
impl AudioStorage for S3AudioStorage {
    async fn put_audio(&self, key: &str, bytes: Bytes, content_type: &str) -> StorageResult<()> {
        let path = object_path(key)?;
        let size = bytes.len();

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

        debug!(bucket = %self.bucket, key = %key, size, "Uploaded audio object");
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<Url> {
        let path = object_path(key)?;
        let url = self.store.signed_url(Method::GET, &path, expires_in).await?;
        Ok(url)
    }
}
