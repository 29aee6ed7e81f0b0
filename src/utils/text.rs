// src/utils/text.rs

//! Text cleanup applied to titles and summaries.

use std::sync::LazyLock;

use regex::Regex;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Numeric character references decoded in titles and summaries.
///
/// En dash, right single quotation mark, left and right double quotation marks.
pub const DECODED_CODES: [u32; 4] = [8211, 8217, 8220, 8221];

/// Remove every `<...>` tag, leaving the text between tags untouched.
pub fn strip_markup(html: &str) -> String {
    MARKUP.replace_all(html, "").into_owned()
}

/// Replace `&#NNNN;` with the literal character for the decoded code set.
///
/// Any other reference is left as-is.
pub fn decode_entities(text: &str) -> String {
    let mut result = text.to_string();
    for code in DECODED_CODES {
        if let Some(ch) = char::from_u32(code) {
            result = result.replace(&format!("&#{code};"), &ch.to_string());
        }
    }
    result
}
