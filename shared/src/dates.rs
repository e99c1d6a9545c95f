//! Calendar date handling for show dates.
//!
//! Show dates are calendar days in the venue's local sense. A `YYYY-MM-DD`
//! string is never turned into an instant, so the displayed day cannot shift
//! with the viewer's UTC offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// Ordering key for a show date string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKey {
    Date(NaiveDate),
    /// Unparseable input, ordered after every real date by its text
    Literal(String),
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DateKey::Date(a), DateKey::Date(b)) => a.cmp(b),
            (DateKey::Date(_), DateKey::Literal(_)) => Ordering::Less,
            (DateKey::Literal(_), DateKey::Date(_)) => Ordering::Greater,
            (DateKey::Literal(a), DateKey::Literal(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl DateKey {
    pub fn of(value: &str) -> Self {
        parse_show_date(value)
            .map(DateKey::Date)
            .unwrap_or_else(|| DateKey::Literal(value.to_string()))
    }
}

/// Parse a strict `YYYY-MM-DD` string as a local calendar date.
pub fn parse_local_ymd(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse a show date, falling back to looser formats when it is not `YYYY-MM-DD`.
pub fn parse_show_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(date) = parse_local_ymd(value) {
        return Some(date);
    }
    // An instant keeps the day in its own offset, not the server's zone
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.date());
    }
    ["%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Format a show date as `"Dec 9"`; unparseable input is returned verbatim.
pub fn format_short_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match parse_show_date(value) {
        Some(date) => date.format("%b %-d").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_date_keeps_day() {
        for (input, short) in [
            ("2026-01-01", "Jan 1"),
            ("2026-06-11", "Jun 11"),
            ("2025-12-31", "Dec 31"),
            ("2028-02-29", "Feb 29"),
        ] {
            assert_eq!(format_short_date(input), short);
            assert_eq!(DateKey::of(input), DateKey::Date(parse_local_ymd(input).unwrap()));
        }
    }

    #[test]
    fn test_instant_near_midnight_keeps_its_own_day() {
        let june_11 = DateKey::Date(NaiveDate::from_ymd_opt(2026, 6, 11).unwrap());
        for input in [
            "2026-06-11T23:30:00-07:00",
            "2026-06-11T00:15:00+09:00",
            "2026-06-11T23:59:59-12:00",
            "2026-06-11T00:00:00+14:00",
            "2026-06-11T12:00:00Z",
        ] {
            assert_eq!(DateKey::of(input), june_11, "{}", input);
            assert_eq!(format_short_date(input), "Jun 11", "{}", input);
        }
    }

    #[test]
    fn test_instants_sort_by_their_own_day() {
        let mut keys = vec![
            DateKey::of("2026-06-12T00:30:00+10:00"),
            DateKey::of("2026-06-11T23:30:00-10:00"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                DateKey::Date(NaiveDate::from_ymd_opt(2026, 6, 11).unwrap()),
                DateKey::Date(NaiveDate::from_ymd_opt(2026, 6, 12).unwrap()),
            ]
        );
    }

    #[test]
    fn test_parse_local_ymd_rejects_other_shapes() {
        assert!(parse_local_ymd("2026-6-11").is_none());
        assert!(parse_local_ymd("2026-02-30").is_none());
        assert!(parse_local_ymd("20260611").is_none());
        assert!(parse_local_ymd("+026-06-11").is_none());
    }

    #[test]
    fn test_fallback_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 6, 11);
        assert_eq!(parse_show_date("2026/06/11"), expected);
        assert_eq!(parse_show_date("06/11/2026"), expected);
        assert_eq!(parse_show_date("June 11, 2026"), expected);
        assert_eq!(parse_show_date("2026-06-11T19:30:00"), expected);
        assert_eq!(parse_show_date("TBA"), None);
    }

    #[test]
    fn test_format_short_date() {
        assert_eq!(format_short_date("2025-12-09"), "Dec 9");
        assert_eq!(format_short_date("2026-07-04"), "Jul 4");
        assert_eq!(format_short_date("TBA"), "TBA");
        assert_eq!(format_short_date(""), "");
    }

    #[test]
    fn test_date_key_ordering_is_total() {
        let mut keys = vec![
            DateKey::of("TBA"),
            DateKey::of("2026-03-01"),
            DateKey::of("Announced later"),
            DateKey::of("2025-11-20"),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                DateKey::Date(NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()),
                DateKey::Date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
                DateKey::Literal("Announced later".into()),
                DateKey::Literal("TBA".into()),
            ]
        );
    }
}
