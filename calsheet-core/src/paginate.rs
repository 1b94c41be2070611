//! Splitting events into printable pages.

use crate::error::{CalsheetError, CalsheetResult};
use crate::event::DisplayEvent;
use crate::settings::Settings;

/// A contiguous run of events printed on one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 1-based position in the full document
    pub number: usize,
    pub events: &'a [DisplayEvent],
}

/// Split `events` into pages of `page_size`, keeping order. With
/// `page_filter`, only that 1-based page is returned.
pub fn paginate(
    events: &[DisplayEvent],
    page_size: usize,
    page_filter: Option<usize>,
) -> CalsheetResult<Vec<Page<'_>>> {
    if page_size == 0 {
        return Err(CalsheetError::InvalidPageSize);
    }

    let pages: Vec<Page<'_>> = events
        .chunks(page_size)
        .enumerate()
        .map(|(i, chunk)| Page {
            number: i + 1,
            events: chunk,
        })
        .collect();

    match page_filter {
        None => Ok(pages),
        Some(page) => {
            let total = pages.len();
            page.checked_sub(1)
                .and_then(|index| pages.into_iter().nth(index))
                .map(|selected| vec![selected])
                .ok_or(CalsheetError::PageOutOfRange { page, total })
        }
    }
}

/// Pages plus the header shown on every sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDocument<'a> {
    /// Month and year of the first event, e.g. "March 2024"
    pub title: String,
    pub min_title_size: f64,
    pub pages: Vec<Page<'a>>,
}

impl<'a> CalendarDocument<'a> {
    pub fn new(pages: Vec<Page<'a>>, settings: &Settings) -> CalsheetResult<Self> {
        let first = pages
            .first()
            .and_then(|page| page.events.first())
            .ok_or(CalsheetError::NoEvents)?;

        Ok(CalendarDocument {
            title: first.date.format("%B %Y").to_string(),
            min_title_size: settings.title.min,
            pages,
        })
    }

    pub fn event_count(&self) -> usize {
        self.pages.iter().map(|page| page.events.len()).sum()
    }
}
