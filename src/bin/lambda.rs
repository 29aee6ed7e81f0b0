//! AWS Lambda entry point for news ingestion.
//!
//! Deploy with `cargo lambda build --release --features lambda` and attach a
//! fixed-rate schedule rule (every 5 minutes in the reference deployment).
//!
//! ## Environment Variables
//!
//! - `SOURCE_NAME`: Source tag stored with each record (default: `gobierno`)
//! - `SOURCE_API_URL`: Posts collection endpoint
//! - `MEDIA_PATH`: Key prefix for uploaded media (default: `media/news`)
//! - `BUCKET_NAME`: Media bucket
//! - `TABLE_NAME`: Record table
//! - `MAX_CONCURRENT`: Items processed concurrently per run
//! - `RUST_LOG`: Log filter (falls back to `LOG_LEVEL`)

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use news_ingest::config::aws_ingestor;
use news_ingest::lambda::handler;
use news_ingest::models::Config;

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    let mut config = Config::default();
    config.apply_env_overrides();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    config.validate()?;
    info!("News ingest Lambda starting for source {}", config.source.name);

    let ingestor = aws_ingestor(config).await?;
    let ingestor = &ingestor;
    lambda_runtime::run(service_fn(move |event| async move {
        handler(ingestor, event).await
    }))
    .await
}
