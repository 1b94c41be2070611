//! ICS export.
//!
//! Rows map straight to calendar records (no icons, colors or sizing) and the
//! whole batch is written as a single VCALENDAR.

mod generate;
mod record;

pub use generate::generate_ics;
pub use record::{CalendarEventRecord, EventDuration, to_calendar_event_record, to_calendar_event_records};
