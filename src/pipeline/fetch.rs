// src/pipeline/fetch.rs

//! Candidate fetch: one projected listing, filtered against the watermark.

use crate::error::{AppError, Result};
use crate::models::RawItem;
use crate::services::ContentSource;

/// Fetch the listing and keep only items published strictly after `min_date`.
///
/// A listing failure is fatal for the run.
pub async fn fetch(source: &dyn ContentSource, min_date: Option<i64>) -> Result<Vec<RawItem>> {
    let items = source.list_items().await.map_err(|e| match e {
        AppError::SourceUnavailable(_) => e,
        other => AppError::source_unavailable(other),
    })?;

    let total = items.len();
    let candidates = filter_candidates(items, min_date);
    log::info!("{} of {} items to process", candidates.len(), total);
    Ok(candidates)
}

/// Keep items whose publish time exceeds `min_date` (all when `None`).
///
/// Items without a parseable publish time cannot be keyed and are dropped.
pub fn filter_candidates(items: Vec<RawItem>, min_date: Option<i64>) -> Vec<RawItem> {
    items
        .into_iter()
        .filter(|item| match item.published_at() {
            Some(published) => min_date.is_none_or(|min| published > min),
            None => {
                log::warn!(
                    "Skipping item {}: unparseable date_gmt '{}'",
                    item.id,
                    item.date_gmt
                );
                false
            }
        })
        .collect()
}
