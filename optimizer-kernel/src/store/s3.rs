//! S3-compatible object store backend. The location key is the object key
//! inside a fixed bucket.

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::debug;

pub struct S3RecordStore {
    client: Client,
    bucket: String,
}

impl S3RecordStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }

    /// Builds a client from the standard AWS environment (credentials chain,
    /// profile), overriding the region when one is configured.
    pub async fn from_env(bucket: impl Into<String>, region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), bucket)
    }
}

fn backend_error<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Backend(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl RecordStore for S3RecordStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match self.client.head_object().bucket(&self.bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(HeadObjectError::is_not_found) => Ok(false),
            Err(e) => Err(backend_error(e)),
        }
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let output = match self.client.get_object().bucket(&self.bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(GetObjectError::is_no_such_key) => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(backend_error(e)),
        };
        let bytes = output.body.collect().await.map_err(backend_error)?.into_bytes();
        debug!(bucket = %self.bucket, key, bytes = bytes.len(), "fetched object");
        Ok(bytes.to_vec())
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let len = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(backend_error)?;
        debug!(bucket = %self.bucket, key, bytes = len, "stored object");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
