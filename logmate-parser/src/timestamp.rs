use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    // yyyy/MM/dd-HH:mm:ss with an optional .SSS, as a standalone token.
    // [0-9] instead of \d: \d would also accept non-ASCII digits.
    static ref TIMESTAMP_RE: Regex = Regex::new(
        r"\b([0-9]{4})/([0-9]{2})/([0-9]{2})-([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{3}))?\b"
    ).unwrap();
}

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// extract the first embedded timestamp of a line, interpreted as UTC
///
/// only the leftmost timestamp-shaped token is considered. if its digits do
/// not form a valid date and time the line has no timestamp.
pub fn extract_timestamp(raw_line: &str) -> Option<DateTime<Utc>> {
    let caps = TIMESTAMP_RE.captures(raw_line)?;
    let field = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let millis = match caps.get(7) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?
        .and_hms_milli_opt(field(4)?, field(5)?, field(6)?, millis)
        .map(|naive| naive.and_utc())
}

/// render an instant as `yyyy-MM-dd HH:mm:ss` in the given zone
pub fn format_in<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

/// render an instant as `yyyy-MM-dd HH:mm:ss` in the local zone
pub fn format_local(instant: &DateTime<Utc>) -> String {
    format_in(instant, &Local)
}
