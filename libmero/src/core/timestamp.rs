//! Utilities for the calendar dates and timestamps stored in sample records
use crate::core::error::{Error, Result};
use serde::Serializer;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Format of a calendar date, e.g. `2025-08-31`
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Format of a timestamp with local time, e.g. `2025-08-31 10:00:00`
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// The current local date and time, truncated to whole seconds. Falls back to UTC when the local
/// offset cannot be determined (e.g. in a multi-threaded process on some platforms).
pub fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let time = now.time();
    PrimitiveDateTime::new(now.date(), time.replace_nanosecond(0).unwrap_or(time))
}

/// Parse a calendar date in `YYYY-MM-DD` format
pub fn parse_date(s: &str) -> Result<Date> {
    Date::parse(s.trim(), DATE_FORMAT).map_err(|_| Error::Parse(s.to_string()))
}

pub fn format_date(date: &Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

pub fn format_timestamp(ts: &PrimitiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).unwrap_or_else(|_| ts.to_string())
}

/// Serializes a [PrimitiveDateTime] using [TIMESTAMP_FORMAT]
pub fn serialize_timestamp<S: Serializer>(ts: &PrimitiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

/// Serializes an optional [Date] using [DATE_FORMAT]
pub fn serialize_date_option<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => s.serialize_some(&format_date(d)),
        None => s.serialize_none(),
    }
}
