//! ICS file generation.

use icalendar::{Calendar, Component, EventLike};

use super::record::CalendarEventRecord;
use crate::error::{CalsheetError, CalsheetResult};

const PRODID: &str = "-//calsheet//EN";

/// Generate one VCALENDAR holding every record.
///
/// All records are checked first; a single bad record fails the batch and
/// nothing is produced.
pub fn generate_ics(records: &[CalendarEventRecord]) -> CalsheetResult<String> {
    for (i, record) in records.iter().enumerate() {
        validate(record).map_err(|reason| {
            CalsheetError::IcsGenerate(format!("event {} ('{}'): {}", i + 1, record.title, reason))
        })?;
    }

    let mut cal = Calendar::new();

    for record in records {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&uuid::Uuid::new_v4().to_string());
        ics_event.summary(&record.title);

        let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        ics_event.add_property("DTSTAMP", &dtstamp);

        // Floating local time, as written in the CSV
        ics_event.add_property("DTSTART", record.start.format("%Y%m%dT%H%M%S").to_string());
        ics_event.add_property("DURATION", record.duration.to_ics());

        if let Some(ref desc) = record.description {
            ics_event.description(desc);
        }

        if let Some(ref loc) = record.location {
            ics_event.location(loc);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    log::info!("Generated {} calendar events", records.len());

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn validate(record: &CalendarEventRecord) -> Result<(), String> {
    if record.title.trim().is_empty() {
        return Err("title is empty".to_string());
    }
    if record.duration.is_negative() {
        return Err(format!(
            "duration is negative ({} minutes); END is before START",
            record.duration.total_minutes()
        ));
    }
    Ok(())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with ours
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
