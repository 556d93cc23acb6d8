//! S3-based object storage operations
mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, presigning::PresigningConfig,
    Client as S3Client,
};
use tracing::debug;

pub use error::{BucketError, BucketResult};

use crate::types::{ConfigError, StorageConfig};

/// Operations the signed URL provider needs from an object storage backend
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Checks whether an object with exactly this key exists
    ///
    /// A missing object is `Ok(false)`, never an error.
    async fn object_exists(&self, key: &str) -> BucketResult<bool>;

    /// Produces a presigned GET URL for `key`, valid for `expires_in`
    async fn presign_get(&self, key: &str, expires_in: Duration) -> BucketResult<String>;

    /// Lists every key starting with `prefix`, in backend order
    async fn list_keys(&self, prefix: &str) -> BucketResult<Vec<String>>;
}

/// Object store backed by an S3 bucket
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3ObjectStore {
    /// Creates a new S3 object store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - Bucket holding the objects
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// Builds the S3 client described by `config`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Credentials` if no usable AWS credentials can be resolved
    pub async fn from_config(config: &StorageConfig) -> Result<Self, ConfigError> {
        let s3_client = S3Client::from_conf(config.s3_client_config().await?);
        Ok(Self::new(Arc::new(s3_client), config.bucket_name.clone()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn object_exists(&self, key: &str) -> BucketResult<bool> {
        debug!("Checking if object exists: {key}");

        let result = self
            .s3_client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_))
                    || service_err.raw().status().as_u16() == 404 =>
            {
                debug!("Object does not exist: {key}");
                Ok(false)
            }
            Err(e) => Err(BucketError::from(e)),
        }
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> BucketResult<String> {
        let presigned_config = PresigningConfig::expires_in(expires_in)?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigned_config)
            .await?;

        debug!(
            "Generated presigned GET URL for {key}, valid for {}s",
            expires_in.as_secs()
        );

        Ok(presigned_request.uri().to_string())
    }

    async fn list_keys(&self, prefix: &str) -> BucketResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self
                .s3_client
                .list_objects_v2()
                .bucket(&self.bucket_name)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(ToString::to_string)),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Listed {} keys under {prefix}", keys.len());
        Ok(keys)
    }
}
