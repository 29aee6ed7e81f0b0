//! Storage abstractions for record persistence and media objects.
//!
//! Two seams are defined here:
//! - [`ItemStore`]: the record store, addressed by `(Source, CreatedAt)`
//! - [`ObjectStore`]: durable object storage for transferred media
//!
//! ## Backends
//!
//! - [`LocalStorage`]: filesystem backend for local runs and tests
//! - `DynamoItemStore` / `S3ObjectStore`: AWS backends (feature `aws`)

pub mod local;

#[cfg(feature = "aws")]
pub mod dynamo;
#[cfg(feature = "aws")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::NormalizedItem;

// Re-export for convenience
pub use local::LocalStorage;

#[cfg(feature = "aws")]
pub use dynamo::DynamoItemStore;
#[cfg(feature = "aws")]
pub use s3::S3ObjectStore;

/// Record store keyed by partition `Source` and sort key `CreatedAt`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// `CreatedAt` of the most recent record for `source`, `None` if the source was never ingested.
    async fn latest_created_at(&self, source: &str) -> Result<Option<i64>>;

    /// Upsert a single record. An existing record with the same key is replaced.
    async fn put_item(&self, item: &NormalizedItem) -> Result<()>;
}

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub public_read: bool,
}

/// Durable object storage. Only writes are needed.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `object` in the configured bucket.
    async fn put_object(&self, object: PutObject) -> Result<()>;
}
