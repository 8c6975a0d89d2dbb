//! Canada Post event times.
//!
//! Occurrences carry a local date, a local time and a zone abbreviation.
//! Only the North American abbreviations Canada Post emits are known; an
//! unknown zone leaves the event without a timestamp.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

const ZONE_OFFSETS_MINUTES: &[(&str, i32)] = &[
    ("NST", -210),
    ("NDT", -150),
    ("AST", -240),
    ("ADT", -180),
    ("EST", -300),
    ("EDT", -240),
    ("CST", -360),
    ("CDT", -300),
    ("MST", -420),
    ("MDT", -360),
    ("PST", -480),
    ("PDT", -420),
    ("AKST", -540),
    ("AKDT", -480),
    ("HST", -600),
    ("UTC", 0),
    ("GMT", 0),
];

/// UTC offset for a zone abbreviation.
pub fn zone_offset(abbreviation: &str) -> Option<FixedOffset> {
    let abbreviation = abbreviation.trim().to_uppercase();
    ZONE_OFFSETS_MINUTES
        .iter()
        .find(|(name, _)| *name == abbreviation)
        .and_then(|(_, minutes)| FixedOffset::east_opt(minutes * 60))
}

/// Combine an occurrence's date, time and zone into a UTC instant.
pub fn event_instant(date: &str, time: &str, zone: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M"))
        .ok()?;
    let offset = zone_offset(zone)?;
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|t| t.with_timezone(&Utc))
}
