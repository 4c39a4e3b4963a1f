use std::cmp::Ordering;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Where a date-valued attribute falls relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DatePosition {
    /// Whether the value lies on `now`'s local calendar day.
    pub(super) same_day: bool,
    /// Order of the value against `now`; by day for date-only values.
    pub(super) ordering: Ordering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsedDate {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

fn parse_date(raw: &str) -> Option<ParsedDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(ParsedDate::Day(day));
    }

    // stored date-times carry no offset and are UTC
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ParsedDate::Instant(naive.and_utc()));
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|instant| ParsedDate::Instant(instant.with_timezone(&Utc)))
}

/// Locates a date-valued attribute against `now`.
///
/// Date-only values compare by day. Date-times compare by instant, so a time later
/// today is both on the same day and in the future.
pub(super) fn locate(value: Option<&Value>, now: DateTime<Local>) -> Option<DatePosition> {
    let parsed = parse_date(value?.as_str()?)?;
    let today = now.date_naive();

    let position = match parsed {
        ParsedDate::Day(day) => DatePosition {
            same_day: day == today,
            ordering: day.cmp(&today),
        },
        ParsedDate::Instant(instant) => DatePosition {
            same_day: instant.with_timezone(now.offset()).date_naive() == today,
            ordering: instant.cmp(&now.with_timezone(&Utc)),
        },
    };

    Some(position)
}
