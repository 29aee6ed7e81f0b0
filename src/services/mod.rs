//! Service layer: external collaborators the pipeline talks to.
//!
//! - [`ContentSource`]: the posts collection (watermark probe, candidate list)
//! - [`MediaSource`]: media descriptors and asset downloads
//! - [`WordPressClient`]: HTTP implementation of both

mod wordpress;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DownloadedMedia, MediaInfo, RawItem};

pub use wordpress::WordPressClient;

/// The external content source.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Publish time (epoch millis) of the single newest item.
    ///
    /// Fails with `SourceUnavailable` on any error or when the source is empty.
    async fn latest_published(&self) -> Result<i64>;

    /// One field-projected request for the current item listing.
    async fn list_items(&self) -> Result<Vec<RawItem>>;
}

/// Media metadata and asset access.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Resolve a featured media reference to its asset URL and extension.
    async fn media_info(&self, href: &str) -> Result<MediaInfo>;

    /// Fetch the asset body with its reported content type and length.
    async fn download(&self, url: &str) -> Result<DownloadedMedia>;
}
