//! Input sanitization helpers shared by form handling and page rendering

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Zero-padded `YYYY-MM-DD`, optionally followed by a time and offset
static ISO8601_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?)?$",
    )
    .expect("ISO-8601 pattern is valid")
});

/// Replace HTML-significant characters with their entities.
///
/// Covers the same set as the usual form sanitizers (`& < > " ' / \ ``)
/// so escaped values are safe inside element bodies and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Parse an ISO-8601 calendar date, optionally followed by a time part.
///
/// Accepts `2026-10-18`, `2026-10-18T09:30:00`, and RFC 3339 timestamps
/// with an offset. Only the date component is kept.
pub fn parse_iso8601_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if !ISO8601_SHAPE.is_match(input) {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}
