//! ISO-8601 parsing for DATE/START/END cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CalsheetError, CalsheetResult};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Parse a DATE cell. Date-times are accepted and truncated to their date.
pub fn parse_date(value: &str, row: usize) -> CalsheetResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_datetime_str(value)
        .map(|dt| dt.date())
        .ok_or_else(|| invalid(row, "DATE", value))
}

/// Parse a START/END cell. A bare time of day is placed on `date`; a bare
/// date means midnight. Offsets are dropped, keeping the wall-clock time.
pub fn parse_datetime(
    value: &str,
    date: NaiveDate,
    row: usize,
    column: &'static str,
) -> CalsheetResult<NaiveDateTime> {
    if let Some(dt) = parse_datetime_str(value) {
        return Ok(dt);
    }

    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
        .map(|time| date.and_time(time))
        .ok_or_else(|| invalid(row, column, value))
}

fn parse_datetime_str(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn invalid(row: usize, column: &'static str, value: &str) -> CalsheetError {
    CalsheetError::DateParse {
        row,
        column,
        value: value.to_string(),
    }
}

/// 12-hour clock without leading zero, e.g. "3:00PM".
pub fn format_clock(dt: &NaiveDateTime) -> String {
    dt.format("%-I:%M%p").to_string()
}
