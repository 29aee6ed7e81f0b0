// src/utils/time.rs

//! Timestamp conversion helpers.

use chrono::{DateTime, NaiveDateTime};

const GMT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Convert a source publish time to epoch milliseconds.
///
/// The source reports `date_gmt` without an offset, so naive values are read
/// as UTC. Values carrying an explicit offset (RFC 3339) are honored.
pub fn gmt_to_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in GMT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis())
}
