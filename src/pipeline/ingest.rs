// src/pipeline/ingest.rs

//! Ingestion run orchestrator.
//!
//! Watermark -> (conditionally) fetch -> per item: media chain + normalize
//! -> batch persist. Items are processed concurrently up to
//! `ingest.max_concurrent`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Config, NormalizedItem, RawItem};
use crate::pipeline::{WatermarkCheck, fetch, media, normalize, persist, watermark};
use crate::services::{ContentSource, MediaSource};
use crate::storage::{ItemStore, ObjectStore};

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Watermark the run started from
    pub watermark: Option<i64>,
    /// True when the source had nothing newer and no fetch happened
    pub skipped: bool,
    pub items: Vec<NormalizedItem>,
    pub persisted: usize,
    pub persist_failures: Vec<i64>,
    pub media_attached: usize,
    pub media_skipped: usize,
}

/// Wires the external collaborators together for a source.
#[derive(Clone)]
pub struct Ingestor {
    config: Arc<Config>,
    source: Arc<dyn ContentSource>,
    media: Arc<dyn MediaSource>,
    items: Arc<dyn ItemStore>,
    objects: Arc<dyn ObjectStore>,
}

impl Ingestor {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn ContentSource>,
        media: Arc<dyn MediaSource>,
        items: Arc<dyn ItemStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            source,
            media,
            items,
            objects,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compare the stored watermark with the source without fetching anything else.
    pub async fn check_watermark(&self) -> Result<WatermarkCheck> {
        watermark::check(
            self.items.as_ref(),
            self.source.as_ref(),
            &self.config.source.name,
        )
        .await
    }

    /// Execute one run.
    ///
    /// Only source-level failures abort the run. Media and persistence
    /// failures are recorded in the report.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let source_name = self.config.source.name.as_str();
        log::info!("Getting news for {source_name} ...");

        let check = self.check_watermark().await?;
        let mut report = RunReport {
            source: source_name.to_string(),
            started_at,
            finished_at: started_at,
            watermark: check.min_date(),
            skipped: false,
            items: Vec::new(),
            persisted: 0,
            persist_failures: Vec::new(),
            media_attached: 0,
            media_skipped: 0,
        };

        if !check.should_run() {
            log::info!("No news to save ({check:?}).");
            report.skipped = true;
            report.finished_at = Utc::now();
            return Ok(report);
        }

        let candidates = fetch::fetch(self.source.as_ref(), check.min_date()).await?;
        let concurrency = self.config.ingest.max_concurrent.max(1);

        let processed: Vec<(NormalizedItem, bool)> = stream::iter(candidates)
            .map(|item| async move { self.process_item(item).await })
            .buffered(concurrency)
            .collect()
            .await;

        for (item, attached) in processed {
            if attached {
                report.media_attached += 1;
            } else {
                report.media_skipped += 1;
            }
            report.items.push(item);
        }

        let persisted = persist::save_all(self.items.as_ref(), &report.items, concurrency).await;
        report.persisted = persisted.persisted;
        report.persist_failures = persisted.failed;
        report.finished_at = Utc::now();

        log::info!(
            "Run for {} finished: {} items, {} persisted, {} with image",
            report.source,
            report.items.len(),
            report.persisted,
            report.media_attached
        );
        Ok(report)
    }

    async fn process_item(&self, item: RawItem) -> (NormalizedItem, bool) {
        let outcome = media::acquire(
            self.media.as_ref(),
            self.objects.as_ref(),
            &self.config.media,
            &item,
        )
        .await;
        let normalized = normalize::normalize(&item, &self.config.source.name, &outcome);
        (normalized, outcome.is_attached())
    }
}
