// src/pipeline/media.rs

//! Media chain: resolve -> download -> upload, per item.
//!
//! Every stage failure stays local. The only effect visible to the rest of
//! the pipeline is the returned [`MediaOutcome`].

use crate::error::{AppError, Result};
use crate::models::{DownloadedMedia, MediaConfig, MediaInfo, MediaOutcome, RawItem, SkipReason};
use crate::services::MediaSource;
use crate::storage::{ObjectStore, PutObject};

/// Resolve a media reference to its asset URL and extension.
///
/// When the MIME type carries no subtype the extension falls back to the
/// asset URL's file suffix.
pub async fn resolve_info(media: &dyn MediaSource, href: &str) -> Result<MediaInfo> {
    let mut info = media.media_info(href).await.map_err(|e| match e {
        AppError::MediaResolution { .. } => e,
        other => AppError::media_resolution(href, other),
    })?;
    if info.extension.is_empty() {
        info.extension = extension_from_url(&info.url).unwrap_or_default();
    }
    Ok(info)
}

/// Download the asset in full.
pub async fn download(media: &dyn MediaSource, url: &str) -> Result<DownloadedMedia> {
    log::info!("Downloading image ({url}) ...");
    let downloaded = media.download(url).await.map_err(|e| match e {
        AppError::MediaDownload { .. } => e,
        other => AppError::media_download(url, other),
    })?;
    log::info!("Image ({url}) downloaded.");
    Ok(downloaded)
}

/// Upload a downloaded asset under `key`. Never retried.
pub async fn upload(
    objects: &dyn ObjectStore,
    downloaded: DownloadedMedia,
    key: &str,
    public_read: bool,
) -> Result<String> {
    log::info!("Uploading image ({key}) ...");
    let object = PutObject {
        key: key.to_string(),
        content_length: downloaded.content_length,
        content_type: downloaded.content_type,
        body: downloaded.bytes,
        public_read,
    };
    objects.put_object(object).await.map_err(|e| match e {
        AppError::MediaUpload { .. } => e,
        other => AppError::media_upload(key, other),
    })?;
    log::info!("Image ({key}) successfully uploaded.");
    Ok(key.to_string())
}

/// Run the whole chain for one item.
pub async fn acquire(
    media: &dyn MediaSource,
    objects: &dyn ObjectStore,
    config: &MediaConfig,
    item: &RawItem,
) -> MediaOutcome {
    let Some(href) = item.featured_media_href() else {
        return MediaOutcome::Skipped(SkipReason::NoMedia);
    };

    let info = match resolve_info(media, href).await {
        Ok(info) => info,
        Err(e) => return skipped(item, SkipReason::Resolution(e.to_string())),
    };

    let downloaded = match download(media, &info.url).await {
        Ok(downloaded) => downloaded,
        Err(e) => return skipped(item, SkipReason::Download(e.to_string())),
    };

    let key = config.object_key(item.id, &info.extension);
    match upload(objects, downloaded, &key, config.public_read).await {
        Ok(key) => MediaOutcome::Attached { key },
        Err(e) => skipped(item, SkipReason::Upload(e.to_string())),
    }
}

fn skipped(item: &RawItem, reason: SkipReason) -> MediaOutcome {
    log::warn!("Item {} continues without image: {}", item.id, reason);
    MediaOutcome::Skipped(reason)
}

fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
