// src/config.rs

//! Configuration loading and dependency wiring.
//!
//! Binaries resolve a [`Config`] here and turn it into a ready [`Ingestor`]
//! backed either by the local filesystem or by AWS.

use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::pipeline::Ingestor;
use crate::services::WordPressClient;
use crate::storage::LocalStorage;

/// Load configuration from a TOML file, falling back to defaults, then validate.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        log::warn!("No config at {}, using defaults.", path.display());
        Config::default()
    };

    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config: {e}")))?;
    Ok(config)
}

/// Ingestor backed by the local filesystem under `storage.local_dir`.
pub fn local_ingestor(config: Config) -> Result<Ingestor> {
    let client = Arc::new(WordPressClient::new(&config.source)?);
    let storage = Arc::new(LocalStorage::new(
        &config.storage.local_dir,
        &config.storage.bucket,
    ));

    Ok(Ingestor::new(
        Arc::new(config),
        client.clone(),
        client,
        storage.clone(),
        storage,
    ))
}

/// Ingestor backed by DynamoDB and S3, using the default AWS credential chain.
#[cfg(feature = "aws")]
pub async fn aws_ingestor(config: Config) -> Result<Ingestor> {
    use crate::storage::{DynamoItemStore, S3ObjectStore};

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = Arc::new(WordPressClient::new(&config.source)?);
    let items = Arc::new(DynamoItemStore::from_conf(&sdk_config, &config.storage.table));
    let objects = Arc::new(S3ObjectStore::from_conf(&sdk_config, &config.storage.bucket));

    log::info!("Using table {} and bucket {}", items.table(), objects.bucket());

    Ok(Ingestor::new(
        Arc::new(config),
        client.clone(),
        client,
        items,
        objects,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.source.name, "gobierno");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[ingest]\nmax_concurrent = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_local_ingestor_builds() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.local_dir = tmp.path().to_path_buf();
        let ingestor = local_ingestor(config).unwrap();
        assert_eq!(ingestor.config().storage.local_dir, tmp.path());
    }
}
