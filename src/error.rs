// src/error.rs

//! Unified error handling for the ingestion pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The content source could not provide the watermark probe or the candidate list.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Media metadata lookup failed
    #[error("Media resolution failed for {href}: {message}")]
    MediaResolution { href: String, message: String },

    /// Media asset download failed
    #[error("Media download failed for {url}: {message}")]
    MediaDownload { url: String, message: String },

    /// Media asset upload failed
    #[error("Media upload failed for {key}: {message}")]
    MediaUpload { key: String, message: String },

    /// A single item write failed
    #[error("Persist error for item {id}: {message}")]
    Persist { id: i64, message: String },

    /// Backing store error (query or object storage)
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a source-unavailable error.
    pub fn source_unavailable(message: impl fmt::Display) -> Self {
        Self::SourceUnavailable(message.to_string())
    }

    /// Create a media resolution error.
    pub fn media_resolution(href: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::MediaResolution {
            href: href.into(),
            message: message.to_string(),
        }
    }

    /// Create a media download error.
    pub fn media_download(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::MediaDownload {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a media upload error.
    pub fn media_upload(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::MediaUpload {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a persistence error for one item.
    pub fn persist(id: i64, message: impl fmt::Display) -> Self {
        Self::Persist {
            id,
            message: message.to_string(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
