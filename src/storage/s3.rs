//! AWS S3 object storage implementation.
//!
//! Media assets are written with `PutObject`, carrying the source response's
//! content type and length, optionally with the `public-read` canned ACL.

use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::{ObjectStore, PutObject};

/// S3-backed media storage.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store for `bucket`.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Create from a loaded AWS configuration.
    pub fn from_conf(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self::new(Client::new(config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<()> {
        let size = object.body.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body));

        if let Some(content_type) = object.content_type {
            request = request.content_type(content_type);
        }
        if let Some(length) = object.content_length.and_then(|l| i64::try_from(l).ok()) {
            request = request.content_length(length);
        }
        if object.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request.send().await.map_err(|e| {
            AppError::storage(format!(
                "put s3://{}/{} failed: {}",
                self.bucket,
                object.key,
                DisplayErrorContext(&e)
            ))
        })?;

        log::info!("Wrote {} bytes to s3://{}/{}", size, self.bucket, object.key);
        Ok(())
    }
}
