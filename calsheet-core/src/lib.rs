//! Core of calsheet: CSV event rows in, render-ready events and ICS out.
//!
//! - `row` loads CSV records
//! - `normalize` turns rows into `DisplayEvent`s (colors, icons, sizing)
//! - `paginate` splits events into printable pages
//! - `ics` maps rows to calendar records and writes .ics text

pub mod color;
pub mod datetime;
pub mod error;
pub mod event;
pub mod icon;
pub mod ics;
pub mod normalize;
pub mod paginate;
pub mod row;
pub mod settings;

pub use error::{CalsheetError, CalsheetResult};
pub use event::{DisplayEvent, Icon};
pub use paginate::{CalendarDocument, Page, paginate};
pub use row::SourceRow;
pub use settings::Settings;
