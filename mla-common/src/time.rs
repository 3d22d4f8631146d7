//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Naive layouts accepted for `listen_datetime`, tried in order.
///
/// `%.f` also matches an absent fractional part.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Format stamped into output file names
pub const OUTPUT_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Get current local wall-clock timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Parse a listening timestamp into calendar time
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` with either a space or `T`
/// separator, RFC 3339 with an offset, and a bare `YYYY-MM-DD` date
/// (midnight). Offset-bearing values keep their own wall-clock fields.
/// Returns `None` for anything else.
pub fn parse_listen_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Render the `YYYYMMDD_HHMMSS` stamp used in output file names
pub fn output_stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(OUTPUT_STAMP_FORMAT).to_string()
}
