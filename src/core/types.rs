//! Common types used across bizhours_sla modules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Offset-aware layouts accepted besides RFC 3339, tried after the offset
/// has been expanded to `+HH:MM` or `+HHMM` by [`expand_offset`].
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

/// Naive layouts, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an ISO-8601 instant and normalize it to UTC.
///
/// Returns `None` for empty, null-like or unparseable input (including
/// out-of-range values such as `2026-02-30T25:61:00Z`). Naive date-times
/// and bare dates are taken as UTC.
pub fn parse_instant(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if s.is_empty() || is_null_marker(s) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let expanded = expand_offset(s);
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&expanded, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

/// Parse a calendar date, dropping any time-of-day part.
///
/// `2025-06-02`, `2025-06-02T00:00:00` and `2025-06-02 00:00:00+00:00` all
/// yield the same date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Round an hour figure to two decimal places.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Rewrite a `Z` suffix or an hour-only offset (`+00`) as `+HH:MM`.
///
/// Only the part after the date is inspected, so `2025-06-02` is left alone.
fn expand_offset(s: &str) -> String {
    if let Some(rest) = s.strip_suffix(&['Z', 'z'][..]) {
        return format!("{}+00:00", rest);
    }
    let bytes = s.as_bytes();
    let n = bytes.len();
    if n > 13
        && matches!(bytes[n - 3], b'+' | b'-')
        && bytes[n - 2].is_ascii_digit()
        && bytes[n - 1].is_ascii_digit()
        && bytes[n - 4].is_ascii_digit()
    {
        return format!("{}:00", s);
    }
    s.to_string()
}

fn is_null_marker(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "null" | "none" | "nan" | "nat" | "not_a_date"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_utc() {
        let ts = parse_instant("2025-06-02T09:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_normalizes_to_utc() {
        let ts = parse_instant("2025-06-02T06:00:00-03:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());

        let pandas_style = parse_instant("2025-06-02 09:00:00+00:00").unwrap();
        assert_eq!(pandas_style, ts);
    }

    #[test]
    fn test_parse_basic_offset() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        // Jira REST layout
        assert_eq!(parse_instant("2025-06-02T09:00:00.000+0000"), Some(expected));
        assert_eq!(parse_instant("2025-06-02T06:00:00.000-0300"), Some(expected));
        assert_eq!(parse_instant("2025-06-02T09:00:00+0000"), Some(expected));
        assert_eq!(parse_instant("2025-06-02T09:00:00+00"), Some(expected));
        assert_eq!(parse_instant("2025-06-02T09:00Z"), Some(expected));
        assert_eq!(parse_instant("2025-06-02T11:00+02:00"), Some(expected));
        assert_eq!(parse_instant("2025-06-02 09:00:00+0000"), Some(expected));
        assert_eq!(parse_instant("2025-06-02 09:00:00Z"), Some(expected));
    }

    #[test]
    fn test_expand_offset_leaves_dates_alone() {
        assert_eq!(expand_offset("2025-06-02"), "2025-06-02");
        assert_eq!(expand_offset("2025-06-02T09:00:00-03"), "2025-06-02T09:00:00-03:00");
        assert_eq!(expand_offset("2025-06-02T09:00Z"), "2025-06-02T09:00+00:00");
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = parse_instant("2025-06-02T09:30:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid_instants() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("not_a_date").is_none());
        assert!(parse_instant("null").is_none());
        assert!(parse_instant("2026-02-30T25:61:00Z").is_none());
    }

    #[test]
    fn test_parse_date_drops_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(parse_date("2025-06-02"), Some(expected));
        assert_eq!(parse_date("2025-06-02T00:00:00"), Some(expected));
        assert_eq!(parse_date("2025-06-02 00:00:00+00:00"), Some(expected));
        assert_eq!(parse_date("06/02/2025"), None);
        assert_eq!(parse_date("2025"), None);
    }

    #[test]
    fn test_round_hours() {
        assert_eq!(round_hours(10.0), 10.0);
        assert_eq!(round_hours(1.0 / 3.0), 0.33);
        assert_eq!(round_hours(2.0 / 3.0), 0.67);
    }
}
