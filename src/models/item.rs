//! Source-native and persisted item shapes.

use serde::{Deserialize, Serialize};

use crate::utils::time::gmt_to_millis;

/// A `{ "rendered": "..." }` field as returned by the content source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl From<&str> for Rendered {
    fn from(s: &str) -> Self {
        Self {
            rendered: s.to_string(),
        }
    }
}

/// Reference to a featured media descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaRef {
    pub href: String,
}

/// Hypermedia links attached to a raw item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemLinks {
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<MediaRef>,
}

/// An item exactly as the content source publishes it.
///
/// Only the projected fields are modelled; anything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawItem {
    pub id: i64,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub title: Rendered,

    #[serde(default)]
    pub content: Rendered,

    /// Publish time in GMT, without offset (e.g. `2021-03-04T10:15:00`)
    pub date_gmt: String,

    #[serde(rename = "_links", default)]
    pub links: ItemLinks,
}

impl RawItem {
    /// The first featured media reference, if any.
    pub fn featured_media_href(&self) -> Option<&str> {
        self.links
            .featured_media
            .first()
            .map(|m| m.href.as_str())
            .filter(|href| !href.is_empty())
    }

    /// Publish time in epoch milliseconds, `None` when the date does not parse.
    pub fn published_at(&self) -> Option<i64> {
        gmt_to_millis(&self.date_gmt)
    }
}

/// The persisted record.
///
/// `(source, created_at)` is the physical storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedItem {
    pub id: i64,
    pub source: String,
    pub created_at: i64,
    pub title: String,
    pub summary: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
