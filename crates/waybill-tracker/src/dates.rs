//! Carrier date parsing.
//!
//! Carriers mostly report `DD/MM/YYYY H:MM AM` (separators `/`, `.` or `-`,
//! day numbers sometimes written `1st`, `22nd`). Anything else goes through a
//! small set of generic formats. Naive times are taken as UTC.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)(?:st|nd|rd|th)\b").expect("valid ordinal suffix regex")
});

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[/.-](\d{1,2})[/.-](\d{4})\s+(\d{1,2}):(\d{2})\s*([APap][Mm])?")
        .expect("valid day-first date regex")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
    "%d %B %Y %I:%M %p",
    "%d %b %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Parses a carrier date string.
///
/// Returns `None` when no known format matches or the date is not a real
/// calendar date.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = ORDINAL.replace_all(raw.trim(), "$1");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    parse_day_first(cleaned).or_else(|| parse_generic(cleaned))
}

/// Milliseconds since the Unix epoch, or `0` for unparseable dates.
#[must_use]
pub fn event_timestamp(raw: &str) -> i64 {
    parse_event_date(raw).map_or(0, |dt| dt.timestamp_millis())
}

fn parse_day_first(s: &str) -> Option<DateTime<Utc>> {
    let caps = DAY_FIRST.captures(s)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let day = num(1)?;
    let month = num(2)?;
    let year = i32::try_from(num(3)?).ok()?;
    let hour = to_24_hour(num(4)?, caps.get(6).map(|m| m.as_str()));
    let minute = num(5)?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(date.and_time(time).and_utc())
}

/// PM adds 12 unless the hour is already 12; AM maps 12 to 0.
fn to_24_hour(hour: u32, meridian: Option<&str>) -> u32 {
    match meridian.map(str::to_ascii_uppercase).as_deref() {
        Some("PM") if hour != 12 => hour + 12,
        Some("AM") if hour == 12 => 0,
        _ => hour,
    }
}

fn parse_generic(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
