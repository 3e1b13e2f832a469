//! Timestamp recovery from fax text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::patterns::{FAX_DATE, FAX_TIME, GERMAN_LONG_DATE};

/// Formats tried by [`try_get_timestamp_from_message`], in order.
/// OCR regularly reads the colon of a clock time as `1`.
const MESSAGE_FORMATS: [&str; 2] = ["%d.%m.%Y %H1%M", "%d.%m.%Y %H:%M"];

const GERMAN_MONTHS: [&str; 12] = [
    "januar",
    "februar",
    "märz",
    "april",
    "mai",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "dezember",
];

/// Display format for resource alarm times.
pub const RESOURCE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Find a date and a clock time anywhere in `line`.
///
/// A found date replaces the date of `fallback`, a found time replaces its
/// time of day (seconds default to zero). Whatever is not found, or does not
/// form a valid calendar value, is kept from `fallback`.
pub fn read_fax_timestamp(line: &str, fallback: NaiveDateTime) -> NaiveDateTime {
    let date = FAX_DATE
        .captures(line)
        .and_then(|caps| {
            let day = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let year = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .unwrap_or_else(|| fallback.date());

    let time = FAX_TIME
        .captures(line)
        .and_then(|caps| {
            let hour = caps[1].parse().ok()?;
            let minute = caps[2].parse().ok()?;
            let second = match caps.get(3) {
                Some(second) => second.as_str().parse().ok()?,
                None => 0,
            };
            NaiveTime::from_hms_opt(hour, minute, second)
        })
        .unwrap_or_else(|| fallback.time());

    date.and_time(time)
}

/// Parse a `dd.mm.yyyy HH:MM` message, or return `fallback`.
pub fn try_get_timestamp_from_message(message: &str, fallback: NaiveDateTime) -> NaiveDateTime {
    parse_message_timestamp(message).unwrap_or(fallback)
}

/// Parse a `dd.mm.yyyy HH:MM` message.
pub fn parse_message_timestamp(message: &str) -> Option<NaiveDateTime> {
    let message = message.trim();
    MESSAGE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(message, format).ok())
}

/// Find a date written out in German ("15. März 2020, 14:32") in `line`.
///
/// Month names are matched case-insensitively; "Maerz" is accepted for
/// printers without umlauts.
pub fn read_german_long_date(line: &str) -> Option<NaiveDateTime> {
    let caps = GERMAN_LONG_DATE.captures(line)?;
    let month_name = caps[2].to_lowercase().replace("ae", "ä");
    let month = GERMAN_MONTHS.iter().position(|name| *name == month_name)? as u32 + 1;
    let date = NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?)?;
    let time = NaiveTime::from_hms_opt(caps[4].parse().ok()?, caps[5].parse().ok()?, 0)?;
    Some(date.and_time(time))
}

/// Normalize a resource alarm time for display.
///
/// Recognized timestamps are re-rendered as `dd.mm.yyyy HH:MM`; anything
/// else is kept as written.
pub fn resource_timestamp(message: &str) -> String {
    match parse_message_timestamp(message) {
        Some(timestamp) => timestamp.format(RESOURCE_TIME_FORMAT).to_string(),
        None => message.trim().to_string(),
    }
}
