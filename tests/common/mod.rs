//! In-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use news_ingest::error::{AppError, Result};
use news_ingest::models::{
    Config, DownloadedMedia, ItemLinks, MediaInfo, MediaRef, NormalizedItem, RawItem, Rendered,
};
use news_ingest::pipeline::Ingestor;
use news_ingest::services::{ContentSource, MediaSource};
use news_ingest::storage::{ItemStore, ObjectStore, PutObject};

/// Build a raw item published `secs` seconds after the epoch.
pub fn raw_item(id: i64, secs: i64, title: &str, media_href: Option<&str>) -> RawItem {
    let date = chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
    RawItem {
        id,
        link: format!("https://example.gob.ar/?p={id}"),
        title: Rendered::from(title),
        content: Rendered::from(format!("<p>Cuerpo {id}</p>").as_str()),
        date_gmt: date.format("%Y-%m-%dT%H:%M:%S").to_string(),
        links: ItemLinks {
            featured_media: media_href
                .map(|href| {
                    vec![MediaRef {
                        href: href.to_string(),
                    }]
                })
                .unwrap_or_default(),
        },
    }
}

// ----------------------------------------------------------------------------
// Content source
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSource {
    pub items: Vec<RawItem>,
    pub latest: Option<i64>,
    pub fail_listing: bool,
    pub latest_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_items(items: Vec<RawItem>) -> Self {
        let latest = items.iter().filter_map(|i| i.published_at()).max();
        Self {
            items,
            latest,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn latest_published(&self) -> Result<i64> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.latest
            .ok_or_else(|| AppError::source_unavailable("no items"))
    }

    async fn list_items(&self) -> Result<Vec<RawItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(AppError::source_unavailable("connection refused"));
        }
        Ok(self.items.clone())
    }
}

// ----------------------------------------------------------------------------
// Media source
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeMedia {
    /// href -> (asset url, mime subtype)
    pub descriptors: HashMap<String, (String, String)>,
    pub failing_downloads: HashSet<String>,
    pub download_delay: Option<Duration>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub downloads: AtomicUsize,
}

impl FakeMedia {
    pub fn describe(mut self, href: &str, url: &str, extension: &str) -> Self {
        self.descriptors
            .insert(href.to_string(), (url.to_string(), extension.to_string()));
        self
    }

    pub fn fail_download(mut self, url: &str) -> Self {
        self.failing_downloads.insert(url.to_string());
        self
    }
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn media_info(&self, href: &str) -> Result<MediaInfo> {
        self.descriptors
            .get(href)
            .map(|(url, extension)| MediaInfo {
                url: url.clone(),
                extension: extension.clone(),
            })
            .ok_or_else(|| AppError::media_resolution(href, "404 Not Found"))
    }

    async fn download(&self, url: &str) -> Result<DownloadedMedia> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.download_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.downloads.fetch_add(1, Ordering::SeqCst);

        if self.failing_downloads.contains(url) {
            return Err(AppError::media_download(url, "connection reset"));
        }
        Ok(DownloadedMedia {
            bytes: url.as_bytes().to_vec(),
            content_type: Some("image/jpeg".to_string()),
            content_length: Some(url.len() as u64),
        })
    }
}

// ----------------------------------------------------------------------------
// Stores
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryItemStore {
    pub records: Mutex<BTreeMap<(String, i64), NormalizedItem>>,
    pub failing_ids: HashSet<i64>,
    pub puts: AtomicUsize,
}

impl MemoryItemStore {
    pub fn seeded(items: Vec<NormalizedItem>) -> Self {
        let store = Self::default();
        {
            let mut records = store.records.lock().unwrap();
            for item in items {
                records.insert((item.source.clone(), item.created_at), item);
            }
        }
        store
    }

    pub fn failing(ids: &[i64]) -> Self {
        Self {
            failing_ids: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<NormalizedItem> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    pub fn get(&self, id: i64) -> Option<NormalizedItem> {
        self.all().into_iter().find(|i| i.id == id)
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn latest_created_at(&self, source: &str) -> Result<Option<i64>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .keys()
            .filter(|(s, _)| s == source)
            .map(|(_, created_at)| *created_at)
            .max())
    }

    async fn put_item(&self, item: &NormalizedItem) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.failing_ids.contains(&item.id) {
            return Err(AppError::persist(item.id, "ProvisionedThroughputExceeded"));
        }
        self.records
            .lock()
            .unwrap()
            .insert((item.source.clone(), item.created_at), item.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryObjectStore {
    pub objects: Mutex<Vec<PutObject>>,
    pub fail: bool,
}

impl MemoryObjectStore {
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.key.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, object: PutObject) -> Result<()> {
        if self.fail {
            return Err(AppError::storage("AccessDenied"));
        }
        self.objects.lock().unwrap().push(object);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Wiring
// ----------------------------------------------------------------------------

pub struct Harness {
    pub source: Arc<FakeSource>,
    pub media: Arc<FakeMedia>,
    pub items: Arc<MemoryItemStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub ingestor: Ingestor,
}

pub fn harness(
    config: Config,
    source: FakeSource,
    media: FakeMedia,
    items: MemoryItemStore,
    objects: MemoryObjectStore,
) -> Harness {
    let source = Arc::new(source);
    let media = Arc::new(media);
    let items = Arc::new(items);
    let objects = Arc::new(objects);
    let ingestor = Ingestor::new(
        Arc::new(config),
        source.clone(),
        media.clone(),
        items.clone(),
        objects.clone(),
    );
    Harness {
        source,
        media,
        items,
        objects,
        ingestor,
    }
}
