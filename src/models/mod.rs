// src/models/mod.rs

//! Domain models for the ingestion pipeline.

mod config;
mod item;
mod media;

// Re-export all public types
pub use config::{Config, IngestConfig, LoggingConfig, MediaConfig, SourceConfig, StorageConfig};
pub use item::{ItemLinks, MediaRef, NormalizedItem, RawItem, Rendered};
pub use media::{
    DownloadedMedia, MediaDescriptor, MediaInfo, MediaOutcome, SkipReason, extension_from_mime,
};
