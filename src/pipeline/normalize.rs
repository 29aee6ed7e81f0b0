// src/pipeline/normalize.rs

//! Mapping from a source-native item to the persisted record.

use crate::models::{MediaOutcome, NormalizedItem, RawItem};
use crate::utils::text::{decode_entities, strip_markup};

/// Build the persisted record for `raw`.
///
/// `raw` is expected to come out of the candidate fetch, which only yields
/// items with a parseable publish time.
pub fn normalize(raw: &RawItem, source: &str, media: &MediaOutcome) -> NormalizedItem {
    NormalizedItem {
        id: raw.id,
        source: source.to_string(),
        created_at: raw.published_at().unwrap_or_default(),
        title: decode_entities(&raw.title.rendered),
        summary: decode_entities(&strip_markup(&raw.content.rendered)),
        link: raw.link.clone(),
        image: media.key().map(str::to_string),
    }
}
