//! Render-ready event types.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Icon attached to a rendered event.
#[derive(Debug, Clone, PartialEq)]
pub enum Icon {
    /// Sanitized SVG markup, inlined into the page
    Svg(String),
    /// Raster image referenced by path
    Image(PathBuf),
}

/// A fully derived event, ready for the HTML template.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEvent {
    pub date: NaiveDate,
    /// Short weekday, e.g. "Tue"
    pub dow: String,
    /// Day of month without padding, e.g. "5"
    pub day: String,
    /// TYPE, or "TYPE - SUBTYPE"
    pub event_type: String,
    pub name: String,
    pub subtitle: Option<String>,
    pub icon: Option<Icon>,
    pub start_time: String,
    pub end_time: Option<String>,
    /// "3:00PM-5:00PM", or just the start when there is no end
    pub time_range: String,
    pub color: String,
    /// Title font size in em
    pub title_size: f64,
    /// Spacer height in em
    pub spacer_size: f64,
}
