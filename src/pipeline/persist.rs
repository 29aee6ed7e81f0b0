// src/pipeline/persist.rs

//! Best-effort batch persistence.

use futures::stream::{self, StreamExt};

use crate::models::NormalizedItem;
use crate::storage::ItemStore;

/// Result of one `save_all` batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PersistReport {
    pub persisted: usize,
    /// Ids of items whose write failed
    pub failed: Vec<i64>,
}

/// Write every item once, keyed by `(Source, CreatedAt)`.
///
/// Individual failures are logged and counted; the batch always completes.
pub async fn save_all(
    store: &dyn ItemStore,
    items: &[NormalizedItem],
    concurrency: usize,
) -> PersistReport {
    log::info!("Saving {} items ...", items.len());

    let mut report = PersistReport::default();
    let mut writes = stream::iter(items)
        .map(|item| async move { (item, store.put_item(item).await) })
        .buffer_unordered(concurrency.max(1));

    while let Some((item, result)) = writes.next().await {
        match result {
            Ok(()) => report.persisted += 1,
            Err(error) => {
                log::warn!("Error while trying to save item {}: {}", item.id, error);
                report.failed.push(item.id);
            }
        }
    }

    log::info!(
        "Saved {} items ({} failed).",
        report.persisted,
        report.failed.len()
    );
    report
}
