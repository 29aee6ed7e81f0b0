//! Per-stage outcomes of the media chain.

mod common;

use common::*;
use news_ingest::models::{MediaConfig, MediaOutcome, SkipReason};
use news_ingest::pipeline::media::acquire;

const HREF: &str = "https://example.gob.ar/wp-json/wp/v2/media/3";
const ASSET: &str = "https://example.gob.ar/wp-content/uploads/foto.jpg";

#[tokio::test]
async fn no_reference_means_no_media() {
    let item = raw_item(1, 10, "t", None);
    let outcome = acquire(
        &FakeMedia::default(),
        &MemoryObjectStore::default(),
        &MediaConfig::default(),
        &item,
    )
    .await;
    assert_eq!(outcome, MediaOutcome::Skipped(SkipReason::NoMedia));
}

#[tokio::test]
async fn resolution_failure_is_reported() {
    let item = raw_item(1, 10, "t", Some(HREF));
    let outcome = acquire(
        &FakeMedia::default(),
        &MemoryObjectStore::default(),
        &MediaConfig::default(),
        &item,
    )
    .await;
    assert!(matches!(
        outcome,
        MediaOutcome::Skipped(SkipReason::Resolution(_))
    ));
}

#[tokio::test]
async fn download_failure_is_reported() {
    let item = raw_item(1, 10, "t", Some(HREF));
    let media = FakeMedia::default()
        .describe(HREF, ASSET, "jpeg")
        .fail_download(ASSET);
    let objects = MemoryObjectStore::default();
    let outcome = acquire(&media, &objects, &MediaConfig::default(), &item).await;

    assert!(matches!(
        outcome,
        MediaOutcome::Skipped(SkipReason::Download(_))
    ));
    assert!(objects.keys().is_empty());
}

#[tokio::test]
async fn upload_failure_is_reported() {
    let item = raw_item(1, 10, "t", Some(HREF));
    let media = FakeMedia::default().describe(HREF, ASSET, "jpeg");
    let objects = MemoryObjectStore {
        fail: true,
        ..MemoryObjectStore::default()
    };
    let outcome = acquire(&media, &objects, &MediaConfig::default(), &item).await;

    match outcome {
        MediaOutcome::Skipped(SkipReason::Upload(message)) => {
            assert!(message.contains("AccessDenied"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn missing_subtype_falls_back_to_url_suffix() {
    let item = raw_item(9, 10, "t", Some(HREF));
    let media = FakeMedia::default().describe(HREF, ASSET, "");
    let objects = MemoryObjectStore::default();
    let config = MediaConfig {
        path_prefix: "img".into(),
        public_read: false,
    };

    let outcome = acquire(&media, &objects, &config, &item).await;

    assert_eq!(
        outcome,
        MediaOutcome::Attached {
            key: "img/9.jpg".into()
        }
    );
    assert!(!objects.objects.lock().unwrap()[0].public_read);
}
