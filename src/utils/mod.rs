//! Utility functions and helpers.

pub mod http;
pub mod text;
pub mod time;

use url::Url;

/// Percent-encode a URL the way a browser would before requesting it.
///
/// Spaces and non-ASCII characters are escaped; existing escapes are kept.
/// Unparseable input is returned unchanged so the request itself reports the error.
pub fn encode_url(raw: &str) -> String {
    Url::parse(raw.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}
