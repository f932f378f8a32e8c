//! Timestamp encoding for persisted rows.
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision.
//! The fixed width keeps lexicographic order equal to chronological order, so
//! `ORDER BY updated_at` works directly on the text column.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// UTC timestamp used by categories and documents.
pub type Timestamp = DateTime<Utc>;

/// Current time truncated to the precision that survives a storage round-trip.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

pub fn format(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse(value: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::{format, now, parse};

    #[test]
    fn format_then_parse_is_lossless_at_millisecond_precision() {
        let stamp = now();
        let text = format(&stamp);
        assert!(text.ends_with('Z'));
        assert_eq!(parse(&text), Some(stamp));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse("yesterday"), None);
    }

    #[test]
    fn formatted_values_sort_chronologically() {
        let earlier = parse("2024-01-02T03:04:05.006Z").unwrap();
        let later = parse("2024-01-02T03:04:05.100Z").unwrap();
        assert!(format(&earlier) < format(&later));
    }
}
