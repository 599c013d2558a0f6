//! Small string helpers used by [`crate::normalize`].

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

static SIZE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid size regex"));

/// Extracts the first decimal number from a size string.
///
/// `"611g"` → `611.0`, `"1.25L"` → `1.25`, `"pack of 6 x 375ml"` → `6.0`.
/// Strings without digits yield `0.0`.
#[must_use]
pub fn parse_size(size: &str) -> f64 {
    SIZE_NUMBER
        .captures(size)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Upper-cases the first character and leaves the rest untouched.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parses a backend date into a UTC instant.
///
/// Accepts RFC 3339 timestamps, naive date-times (read as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_upstream_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
