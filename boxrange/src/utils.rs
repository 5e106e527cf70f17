use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::bar::PricePoint;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Calendar date of a raw timestamp, if it is in one of the known layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for pattern in ["%Y/%m/%d", "%Y-%m-%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
            return Some(date);
        }
    }

    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y/%m/%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt.date());
        }
    }

    None
}

/// `YYYY.MM.DD`; unparseable input falls back to its first ten characters.
pub fn format_date(timestamp: &str) -> String {
    if timestamp.trim().is_empty() {
        return String::new();
    }
    match parse_date(timestamp) {
        Some(date) => date.format("%Y.%m.%d").to_string(),
        None => timestamp
            .chars()
            .take(10)
            .collect::<String>()
            .replace(['-', '/'], "."),
    }
}

/// `YYYY.MM`, empty when the timestamp cannot be read.
pub fn format_month(timestamp: &str) -> String {
    parse_date(timestamp)
        .map(|date| date.format("%Y.%m").to_string())
        .unwrap_or_default()
}

/// First index in `[start, end]` holding the highest `high_rate`.
pub(crate) fn first_max_high_index(points: &[PricePoint], start: usize, end: usize) -> usize {
    let mut best = start;
    for idx in start..=end {
        if points[idx].high_rate > points[best].high_rate {
            best = idx;
        }
    }
    best
}

/// First index in `[start, end]` holding the lowest `low_rate`.
pub(crate) fn first_min_low_index(points: &[PricePoint], start: usize, end: usize) -> usize {
    let mut best = start;
    for idx in start..=end {
        if points[idx].low_rate < points[best].low_rate {
            best = idx;
        }
    }
    best
}
