use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

// ── Lookup tables ─────────────────────────────────────────────────────────────

/// English weekday names, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// English month names, January first.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Day-first calendar format used for every date shown to or read from the
/// user.
pub const FINNISH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Name of the weekday with Monday-first index `index`, or `""` when out of
/// range.
pub fn weekday_name(index: usize) -> &'static str {
    WEEKDAYS.get(index).copied().unwrap_or("")
}

/// Name of month `month` (`1..=12`), or `""` when out of range.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or("")
}

// ── Dates ─────────────────────────────────────────────────────────────────────

/// Render `date` as `dd.mm.yyyy`.
pub fn format_finnish_date(date: NaiveDate) -> String {
    date.format(FINNISH_DATE_FORMAT).to_string()
}

/// Parse a `dd.mm.yyyy` string typed by the user.
///
/// Surrounding whitespace is ignored. Returns `None` for anything else,
/// including impossible dates such as `31.02.2025`.
pub fn parse_finnish_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), FINNISH_DATE_FORMAT).ok()
}

// ── Timestamps ────────────────────────────────────────────────────────────────

/// The one timestamp layout of every export: ISO 8601 date and time to the
/// second.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an export timestamp written as [`EXPORT_TIMESTAMP_FORMAT`].
///
/// A single space may stand in for the `T`. A trailing `Z` or `±HH:MM`
/// offset is accepted and dropped; the wall clock time as written is kept.
/// Anything else, such as a missing seconds field, is rejected.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let date = s.get(..10)?;
    let rest = s.get(10..)?;
    let rest = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' '))?;
    // HH:MM:SS, then an optional offset.
    let time = rest.get(..8)?;
    let offset = rest.get(8..)?;
    if !(offset.is_empty() || offset == "Z" || is_utc_offset(offset)) {
        debug!("could not parse timestamp \"{}\"", s);
        return None;
    }

    let parsed = NaiveDateTime::parse_from_str(&format!("{date}T{time}"), EXPORT_TIMESTAMP_FORMAT);
    if parsed.is_err() {
        debug!("could not parse timestamp \"{}\"", s);
    }
    parsed.ok()
}

/// `+HH:MM` or `-HH:MM`.
fn is_utc_offset(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 6
        && (b[0] == b'+' || b[0] == b'-')
        && b[1].is_ascii_digit()
        && b[2].is_ascii_digit()
        && b[3] == b':'
        && b[4].is_ascii_digit()
        && b[5].is_ascii_digit()
}
