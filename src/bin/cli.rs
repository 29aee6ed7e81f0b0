//! News ingest CLI
//!
//! Local execution entry point. For AWS Lambda, use `news-ingest-lambda`.

use std::path::PathBuf;
use std::future::Future;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::time::Interval;
use news_ingest::{
    config::{load_config, local_ingestor},
    error::Result,
    models::Config,
    pipeline::{Ingestor, WatermarkCheck},
};

/// news-ingest - incremental news ingestion
#[derive(Parser, Debug)]
#[command(
    name = "news-ingest",
    version,
    about = "Incremental news ingestion with media transfer"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Use DynamoDB and S3 instead of local storage
    #[cfg(feature = "aws")]
    #[arg(long, global = true)]
    aws: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a single ingestion run
    Run {
        /// Print the produced records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trigger a run on a fixed interval until interrupted
    Watch {
        /// Interval in seconds (default: ingest.interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show the stored watermark and whether a run would proceed
    Watermark,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

impl Cli {
    fn use_aws(&self) -> bool {
        #[cfg(feature = "aws")]
        return self.aws;
        #[cfg(not(feature = "aws"))]
        return false;
    }
}

async fn build_ingestor(use_aws: bool, config: Config) -> Result<Ingestor> {
    #[cfg(feature = "aws")]
    if use_aws {
        return news_ingest::config::aws_ingestor(config).await;
    }
    #[cfg(not(feature = "aws"))]
    if use_aws {
        return Err(news_ingest::error::AppError::config(
            "built without the `aws` feature",
        ));
    }
    local_ingestor(config)
}

async fn run_once(ingestor: &Ingestor, json: bool) -> Result<()> {
    let report = ingestor.run().await?;

    if report.skipped {
        log::info!("Source {} is up to date.", report.source);
    } else {
        log::info!(
            "{} items processed: {} persisted, {} failed, {} with image, {} without",
            report.items.len(),
            report.persisted,
            report.persist_failures.len(),
            report.media_attached,
            report.media_skipped
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report.items)?);
    }
    Ok(())
}

/// Run `task` on every tick until `shutdown` resolves.
///
/// Shutdown is honoured while a run is in flight; that run is abandoned.
async fn watch_loop<F, Fut>(mut ticker: Interval, shutdown: impl Future<Output = ()>, mut task: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = &mut shutdown => {
                log::warn!("Run interrupted.");
                break;
            }
            _ = task() => {}
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.verbose, "info");
            log::error!("{e}");
            return Err(e);
        }
    };
    init_logging(cli.verbose, &config.logging.level);
    log::info!("Loaded configuration from {}", cli.config.display());
    let use_aws = cli.use_aws();

    match cli.command {
        Command::Validate => {
            log::info!("✓ Config OK (source {})", config.source.name);
        }

        Command::Run { json } => {
            let ingestor = build_ingestor(use_aws, config).await?;
            run_once(&ingestor, json).await?;
        }

        Command::Watch { interval } => {
            let secs = interval.unwrap_or(config.ingest.interval_secs).max(1);
            let ingestor = build_ingestor(use_aws, config).await?;
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            log::info!("Triggering a run every {secs}s (Ctrl-C to stop)");
            let shutdown = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            let ingestor = &ingestor;
            watch_loop(ticker, shutdown, move || async move {
                if let Err(e) = run_once(ingestor, false).await {
                    log::error!("Run failed: {e}");
                }
            })
            .await;
            log::info!("Stopping.");
        }

        Command::Watermark => {
            let ingestor = build_ingestor(use_aws, config).await?;
            match ingestor.check_watermark().await? {
                WatermarkCheck::FirstRun => {
                    log::info!("No records stored yet; next run ingests everything.");
                }
                WatermarkCheck::Proceed { saved, available } => {
                    log::info!("Saved: {saved}, available: {available}; next run proceeds.");
                }
                WatermarkCheck::UpToDate { saved, available } => {
                    log::info!("Saved: {saved}, available: {available}; up to date.");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_interrupts_a_run_in_flight() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tx = Some(tx);
        let mut runs = 0;

        let ticker = tokio::time::interval(Duration::from_millis(10));
        let shutdown = async {
            let _ = rx.await;
        };
        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            watch_loop(ticker, shutdown, || {
                runs += 1;
                if let Some(tx) = tx.take() {
                    let _ = tx.send(());
                }
                async { tokio::time::sleep(Duration::from_secs(60)).await }
            }),
        )
        .await;

        assert!(finished.is_ok());
        assert_eq!(runs, 1);
    }

    #[tokio::test]
    async fn runs_repeat_until_shutdown() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tx = Some(tx);
        let mut runs = 0;

        let ticker = tokio::time::interval(Duration::from_millis(5));
        let shutdown = async {
            let _ = rx.await;
        };
        watch_loop(ticker, shutdown, || {
            runs += 1;
            if runs == 3 {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(());
                }
            }
            async {}
        })
        .await;

        assert_eq!(runs, 3);
    }
}
