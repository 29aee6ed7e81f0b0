//! Transient media values produced while processing one item.

use std::fmt;

use serde::Deserialize;

/// Location and type of a featured asset, resolved from its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    pub url: String,
    pub extension: String,
}

/// Media descriptor payload (`guid.rendered`, `mime_type`).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaDescriptor {
    pub guid: crate::models::Rendered,
    #[serde(default)]
    pub mime_type: String,
}

impl MediaDescriptor {
    /// Convert to `MediaInfo`, taking the extension from the MIME subtype.
    pub fn into_info(self) -> MediaInfo {
        MediaInfo {
            extension: extension_from_mime(&self.mime_type),
            url: self.guid.rendered,
        }
    }
}

/// `type/subtype` -> `subtype`; empty when there is no slash.
pub fn extension_from_mime(mime: &str) -> String {
    mime.rsplit_once('/')
        .map(|(_, subtype)| subtype.trim().to_string())
        .unwrap_or_default()
}

/// A fully downloaded asset ready for upload.
#[derive(Clone)]
pub struct DownloadedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl fmt::Debug for DownloadedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadedMedia")
            .field("bytes", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish()
    }
}

/// Why an item ended up without an `Image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The item references no featured media
    NoMedia,
    /// The media descriptor could not be fetched or parsed
    Resolution(String),
    /// The asset could not be downloaded
    Download(String),
    /// The asset could not be stored
    Upload(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMedia => write!(f, "no featured media"),
            SkipReason::Resolution(msg) => write!(f, "resolution failed: {msg}"),
            SkipReason::Download(msg) => write!(f, "download failed: {msg}"),
            SkipReason::Upload(msg) => write!(f, "upload failed: {msg}"),
        }
    }
}

/// Result of the resolve -> download -> upload chain for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaOutcome {
    Attached { key: String },
    Skipped(SkipReason),
}

impl MediaOutcome {
    /// Storage key when the chain succeeded.
    pub fn key(&self) -> Option<&str> {
        match self {
            MediaOutcome::Attached { key } => Some(key),
            MediaOutcome::Skipped(_) => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, MediaOutcome::Attached { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_from_mime_subtype() {
        assert_eq!(extension_from_mime("image/jpeg"), "jpeg");
        assert_eq!(extension_from_mime("image/png"), "png");
        assert_eq!(extension_from_mime("application/vnd.ms-excel"), "vnd.ms-excel");
        assert_eq!(extension_from_mime("garbage"), "");
    }

    #[test]
    fn descriptor_into_info() {
        let json = r#"{ "guid": { "rendered": "https://x/a.jpg" }, "mime_type": "image/jpeg" }"#;
        let descriptor: MediaDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            descriptor.into_info(),
            MediaInfo {
                url: "https://x/a.jpg".into(),
                extension: "jpeg".into()
            }
        );
    }

    #[test]
    fn outcome_key() {
        let attached = MediaOutcome::Attached { key: "k".into() };
        assert_eq!(attached.key(), Some("k"));
        assert!(MediaOutcome::Skipped(SkipReason::NoMedia).key().is_none());
    }
}
