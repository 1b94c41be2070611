//! Row to calendar record mapping.

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::datetime::{parse_date, parse_datetime};
use crate::error::{CalsheetError, CalsheetResult};
use crate::row::{SourceRow, non_empty};
use crate::settings::Settings;

/// Event length split into whole hours and remaining minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl EventDuration {
    pub fn from_minutes(total: i64) -> Self {
        EventDuration {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    pub fn total_minutes(&self) -> i64 {
        self.hours * 60 + self.minutes
    }

    pub fn is_negative(&self) -> bool {
        self.total_minutes() < 0
    }

    /// RFC 5545 DURATION value, e.g. "PT2H0M"
    pub fn to_ics(&self) -> String {
        format!("PT{}H{}M", self.hours, self.minutes)
    }
}

/// One VEVENT worth of data.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEventRecord {
    pub title: String,
    /// Date from DATE, hour and minute from START
    pub start: NaiveDateTime,
    pub duration: EventDuration,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Map one row. Internal mode drops the `[TYPE]` prefix and the description.
pub fn to_calendar_event_record(
    row: &SourceRow,
    row_number: usize,
    internal: bool,
    default_duration: Duration,
) -> CalsheetResult<CalendarEventRecord> {
    let date = parse_date(&row.date, row_number)?;
    let start = parse_datetime(&row.start, date, row_number, "START")?;
    let end = match non_empty(&row.end) {
        Some(end) => parse_datetime(end, date, row_number, "END")?,
        None => start.checked_add_signed(default_duration).ok_or_else(|| {
            CalsheetError::Config(format!(
                "Row {}: default duration runs past the supported date range",
                row_number
            ))
        })?,
    };

    let duration = EventDuration::from_minutes((end - start).num_minutes());
    let start_at = date
        .and_hms_opt(start.hour(), start.minute(), 0)
        .unwrap_or(start);

    let location = non_empty(&row.location).map(str::to_string);

    if internal {
        return Ok(CalendarEventRecord {
            title: row.title.clone(),
            start: start_at,
            duration,
            description: None,
            location,
        });
    }

    Ok(CalendarEventRecord {
        title: format!("[{}] {}", row.event_type, row.title),
        start: start_at,
        duration,
        description: non_empty(&row.description).map(str::to_string),
        location,
    })
}

/// Map every row, in order, with the configured fallback duration.
pub fn to_calendar_event_records(
    rows: &[SourceRow],
    internal: bool,
    settings: &Settings,
) -> CalsheetResult<Vec<CalendarEventRecord>> {
    let fallback = settings.default_duration()?;
    let default_duration = Duration::from_std(fallback)
        .map_err(|e| CalsheetError::Config(format!("Default duration too large: {}", e)))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| to_calendar_event_record(row, i + 1, internal, default_duration))
        .collect()
}
