//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Content source endpoint and HTTP behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Media transfer settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Bucket/table identifiers and local storage root
    #[serde(default)]
    pub storage: StorageConfig,

    /// Run scheduling and fan-out limits
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Log verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.name.trim().is_empty() {
            return Err(AppError::validation("source.name is empty"));
        }
        if self.source.api_url.trim().is_empty() {
            return Err(AppError::validation("source.api_url is empty"));
        }
        url::Url::parse(&self.source.api_url)
            .map_err(|e| AppError::validation(format!("source.api_url is invalid: {e}")))?;
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(AppError::validation("storage.bucket is empty"));
        }
        if self.storage.table.trim().is_empty() {
            return Err(AppError::validation("storage.table is empty"));
        }
        if self.ingest.max_concurrent == 0 {
            return Err(AppError::validation("ingest.max_concurrent must be > 0"));
        }
        if self.ingest.interval_secs == 0 {
            return Err(AppError::validation("ingest.interval_secs must be > 0"));
        }
        Ok(())
    }

    /// Override values from the deployment environment.
    ///
    /// Only the binaries call this; the pipeline itself receives a finished `Config`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("SOURCE_NAME") {
            self.source.name = name;
        }
        if let Some(url) = lookup("SOURCE_API_URL") {
            self.source.api_url = url;
        }
        if let Some(path) = lookup("MEDIA_PATH") {
            self.media.path_prefix = path;
        }
        if let Some(bucket) = lookup("BUCKET_NAME") {
            self.storage.bucket = bucket;
        }
        if let Some(table) = lookup("TABLE_NAME") {
            self.storage.table = table;
        }
        if let Some(n) = lookup("MAX_CONCURRENT").and_then(|v| v.parse().ok()) {
            self.ingest.max_concurrent = n;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

/// Content source endpoint and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source tag stored as the partition key of every record
    #[serde(default = "defaults::source_name")]
    pub name: String,

    /// Posts collection endpoint
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Page size sent with the candidate fetch (source default when unset)
    #[serde(default)]
    pub per_page: Option<u32>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Retries for transient GET failures
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Backoff step between retries in milliseconds
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: defaults::source_name(),
            api_url: defaults::api_url(),
            per_page: None,
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            retry_backoff_ms: defaults::retry_backoff(),
        }
    }
}

/// Media transfer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Key prefix for uploaded assets
    #[serde(default = "defaults::media_path")]
    pub path_prefix: String,

    /// Upload with public-read visibility
    #[serde(default = "defaults::public_read")]
    pub public_read: bool,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            path_prefix: defaults::media_path(),
            public_read: defaults::public_read(),
        }
    }
}

impl MediaConfig {
    /// Deterministic storage key for an item's asset: `{prefix}/{id}.{ext}`.
    pub fn object_key(&self, item_id: i64, extension: &str) -> String {
        let prefix = self.path_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{item_id}.{extension}")
        } else {
            format!("{prefix}/{item_id}.{extension}")
        }
    }
}

/// Remote identifiers and local storage root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object storage bucket for media
    #[serde(default = "defaults::bucket")]
    pub bucket: String,

    /// Record table name
    #[serde(default = "defaults::table")]
    pub table: String,

    /// Root directory for the local backend
    #[serde(default = "defaults::local_dir")]
    pub local_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: defaults::bucket(),
            table: defaults::table(),
            local_dir: defaults::local_dir(),
        }
    }
}

/// Run scheduling and concurrency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Maximum items processed concurrently within a run
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Trigger interval for the watch loop in seconds
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
            interval_secs: defaults::interval(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn source_name() -> String {
        "gobierno".into()
    }
    pub fn api_url() -> String {
        "https://chacabuco.gob.ar/wp-json/wp/v2/posts".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; news-ingest/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_backoff() -> u64 {
        500
    }

    // Media defaults
    pub fn media_path() -> String {
        "media/news".into()
    }
    pub fn public_read() -> bool {
        true
    }

    // Storage defaults
    pub fn bucket() -> String {
        "news-media".into()
    }
    pub fn table() -> String {
        "news".into()
    }
    pub fn local_dir() -> PathBuf {
        PathBuf::from("storage")
    }

    // Ingest defaults
    pub fn max_concurrent() -> usize {
        8
    }
    pub fn interval() -> u64 {
        300
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
