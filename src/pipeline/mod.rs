//! Pipeline stages for an ingestion run.
//!
//! - `watermark`: how far ingestion has progressed, and whether to run
//! - `fetch`: candidate listing filtered by the watermark
//! - `media`: resolve -> download -> upload of the featured asset
//! - `normalize`: raw item to persisted record
//! - `persist`: best-effort batch writes
//! - `ingest`: the run orchestrator

pub mod fetch;
pub mod ingest;
pub mod media;
pub mod normalize;
pub mod persist;
pub mod watermark;

pub use ingest::{Ingestor, RunReport};
pub use persist::PersistReport;
pub use watermark::WatermarkCheck;
