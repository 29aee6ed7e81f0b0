// src/services/wordpress.rs

//! HTTP client for a WordPress-style content source.
//!
//! Serves both the posts collection (watermark probe and candidate fetch)
//! and the media descriptor and asset endpoints.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{DownloadedMedia, MediaDescriptor, MediaInfo, RawItem, SourceConfig};
use crate::services::{ContentSource, MediaSource};
use crate::utils::encode_url;
use crate::utils::http::{RetryPolicy, create_async_client, get_with_retry};
use crate::utils::time::gmt_to_millis;

/// Fields projected on the candidate fetch.
const ITEM_FIELDS: [&str; 6] = [
    "id",
    "link",
    "title.rendered",
    "content.rendered",
    "date_gmt",
    "_links.wp:featuredmedia.0.href",
];

/// Fields projected on the media descriptor lookup.
const MEDIA_FIELDS: [&str; 2] = ["guid.rendered", "mime_type"];

#[derive(Debug, Deserialize)]
struct PublishDate {
    date_gmt: String,
}

/// Decode listing entries one by one. Malformed entries are dropped with a warning.
fn decode_items(values: Vec<Value>) -> Vec<RawItem> {
    values
        .into_iter()
        .filter_map(|value| {
            let id = value.get("id").map(Value::to_string);
            match serde_json::from_value::<RawItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!(
                        "Skipping malformed item {}: {}",
                        id.as_deref().unwrap_or("<no id>"),
                        e
                    );
                    None
                }
            }
        })
        .collect()
}

/// Content source client.
#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    api_url: String,
    per_page: Option<u32>,
    retry: RetryPolicy,
}

impl WordPressClient {
    /// Build a client with its own HTTP connection pool.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = create_async_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Build on top of an existing HTTP client.
    pub fn with_client(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            per_page: config.per_page,
            retry: RetryPolicy::from_config(config),
        }
    }

    fn item_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("_fields", ITEM_FIELDS.join(","))];
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        query
    }
}

#[async_trait]
impl ContentSource for WordPressClient {
    async fn latest_published(&self) -> Result<i64> {
        let query = [("_fields", "date_gmt".to_string()), ("per_page", "1".to_string())];
        let dates: Vec<PublishDate> = get_with_retry(&self.client, &self.api_url, &query, self.retry)
            .await
            .map_err(AppError::source_unavailable)?
            .json()
            .await
            .map_err(AppError::source_unavailable)?;

        let newest = dates
            .first()
            .ok_or_else(|| AppError::source_unavailable("source returned no items"))?;
        gmt_to_millis(&newest.date_gmt).ok_or_else(|| {
            AppError::source_unavailable(format!("unparseable date_gmt '{}'", newest.date_gmt))
        })
    }

    async fn list_items(&self) -> Result<Vec<RawItem>> {
        let values: Vec<Value> =
            get_with_retry(&self.client, &self.api_url, &self.item_query(), self.retry)
                .await
                .map_err(AppError::source_unavailable)?
                .json()
                .await
                .map_err(AppError::source_unavailable)?;
        let total = values.len();
        let items = decode_items(values);
        log::debug!("Source returned {} items ({} usable)", total, items.len());
        Ok(items)
    }
}

#[async_trait]
impl MediaSource for WordPressClient {
    async fn media_info(&self, href: &str) -> Result<MediaInfo> {
        let query = [("_fields", MEDIA_FIELDS.join(","))];
        let descriptor: MediaDescriptor = get_with_retry(&self.client, href, &query, self.retry)
            .await
            .map_err(|e| AppError::media_resolution(href, e))?
            .json()
            .await
            .map_err(|e| AppError::media_resolution(href, e))?;

        let info = descriptor.into_info();
        if info.url.is_empty() {
            return Err(AppError::media_resolution(href, "descriptor has no url"));
        }
        Ok(info)
    }

    async fn download(&self, url: &str) -> Result<DownloadedMedia> {
        let encoded = encode_url(url);
        let response = get_with_retry(&self.client, &encoded, &[], self.retry)
            .await
            .map_err(|e| AppError::media_download(url, e))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();

        // Buffer the whole body so a broken transfer never reaches the upload.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::media_download(url, e))?;

        Ok(DownloadedMedia {
            content_length: content_length.or(Some(bytes.len() as u64)),
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
