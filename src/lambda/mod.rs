// src/lambda/mod.rs

//! AWS Lambda handler for scheduled ingestion.
//!
//! Each scheduled invocation performs one run:
//! 1. Compares the stored watermark with the source
//! 2. Fetches and processes candidate items
//! 3. Persists the normalized records
//!
//! The invocation payload is opaque and ignored.

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::pipeline::{Ingestor, RunReport};

/// Lambda response payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IngestResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    /// Serialized list of the records produced by the run
    pub body: String,
}

impl IngestResponse {
    /// Build the success payload from a run report.
    pub fn from_report(report: &RunReport) -> Result<Self> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(&report.items)?,
        })
    }
}

/// Main Lambda handler function.
///
/// Fatal run errors are returned as handler errors so the invocation fails.
#[instrument(skip(ingestor, event), fields(request_id = %event.context.request_id))]
pub async fn handler(
    ingestor: &Ingestor,
    event: LambdaEvent<Value>,
) -> std::result::Result<IngestResponse, LambdaError> {
    let start = std::time::Instant::now();
    info!("Received trigger: {}", event.payload);

    match ingestor.run().await {
        Ok(report) => {
            info!(
                items = report.items.len(),
                persisted = report.persisted,
                skipped = report.skipped,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Ingestion run successful"
            );
            Ok(IngestResponse::from_report(&report)?)
        }
        Err(e) => {
            error!("Ingestion run failed: {}", e);
            Err(e.into())
        }
    }
}
