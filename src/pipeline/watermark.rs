// src/pipeline/watermark.rs

//! Watermark tracking: how far ingestion has progressed for a source.
//!
//! The watermark is never stored on its own. It is the `CreatedAt` of the
//! newest persisted record, so it only advances when a write succeeds.

use crate::error::{AppError, Result};
use crate::services::ContentSource;
use crate::storage::ItemStore;

/// Outcome of comparing the saved watermark with the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkCheck {
    /// Nothing persisted yet for this source; every item qualifies.
    FirstRun,
    /// The source has something newer than the watermark.
    Proceed { saved: i64, available: i64 },
    /// The source has published nothing since the watermark.
    UpToDate { saved: i64, available: i64 },
}

impl WatermarkCheck {
    /// Exclusive lower bound for the candidate fetch.
    pub fn min_date(&self) -> Option<i64> {
        match self {
            WatermarkCheck::FirstRun => None,
            WatermarkCheck::Proceed { saved, .. } | WatermarkCheck::UpToDate { saved, .. } => {
                Some(*saved)
            }
        }
    }

    pub fn should_run(&self) -> bool {
        !matches!(self, WatermarkCheck::UpToDate { .. })
    }
}

/// `CreatedAt` of the most recent record for `source`, `None` on first run.
pub async fn latest_saved(store: &dyn ItemStore, source: &str) -> Result<Option<i64>> {
    store.latest_created_at(source).await
}

/// Publish time of the newest item the source currently offers.
///
/// Any failure is reported as `SourceUnavailable` and is fatal for the run.
pub async fn latest_available(source: &dyn ContentSource) -> Result<i64> {
    source.latest_published().await.map_err(|e| match e {
        AppError::SourceUnavailable(_) => e,
        other => AppError::source_unavailable(other),
    })
}

/// False iff a watermark exists and the source has nothing newer.
pub fn should_run(saved: Option<i64>, available: i64) -> bool {
    match saved {
        Some(saved) => available > saved,
        None => true,
    }
}

/// Read the watermark and, when one exists, probe the source.
///
/// On first run the source probe is skipped.
pub async fn check(
    store: &dyn ItemStore,
    source: &dyn ContentSource,
    source_name: &str,
) -> Result<WatermarkCheck> {
    let Some(saved) = latest_saved(store, source_name).await? else {
        return Ok(WatermarkCheck::FirstRun);
    };

    let available = latest_available(source).await?;
    if should_run(Some(saved), available) {
        Ok(WatermarkCheck::Proceed { saved, available })
    } else {
        Ok(WatermarkCheck::UpToDate { saved, available })
    }
}
