use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Timestamp format the schedule service stores and validates
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted naive timestamp layouts, most specific first
const NAIVE_FORMATS: &[&str] = &[
    WIRE_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a wall-clock timestamp as produced by the service or a datetime input.
///
/// Offsets in RFC 3339 strings are dropped after conversion so the wall-clock
/// reading the author saw is kept.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Format a timestamp the way the service expects it
pub fn format_wire(dt: &NaiveDateTime) -> String {
    dt.format(WIRE_FORMAT).to_string()
}

/// Current wall-clock time in the given timezone
pub fn now_in(timezone: &Tz) -> NaiveDateTime {
    Utc::now().with_timezone(timezone).naive_local()
}

/// Number of days in a zero-based month.
///
/// Computed as the day-of-month of the day before the first of the following
/// month, so leap years come from the calendar rather than a table.
pub fn days_in_month(month: u32, year: i32) -> Option<u32> {
    if month > 11 {
        return None;
    }
    let (next_month, next_year) = if month == 11 { (0, year.checked_add(1)?) } else { (month + 1, year) };
    NaiveDate::from_ymd_opt(next_year, next_month + 1, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}

/// Shift a zero-based month by `delta` months, carrying into the year.
///
/// Returns `None` when the result does not fit an `i32` year.
pub fn shift_month(month: u32, year: i32, delta: i32) -> Option<(u32, i32)> {
    let total = i64::from(month) + i64::from(delta);
    let year = i64::from(year) + total.div_euclid(12);
    Some((total.rem_euclid(12) as u32, i32::try_from(year).ok()?))
}

/// Whether a zero-based month can be shown: a real month whose days all
/// fall inside chrono's supported date range
pub fn is_displayable_month(month: u32, year: i32) -> bool {
    days_in_month(month, year).is_some()
}

/// English name of a zero-based month
pub fn month_name(month: u32) -> &'static str {
    match month {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        11 => "December",
        _ => "Unknown",
    }
}
