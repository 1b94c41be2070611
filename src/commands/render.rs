use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use calsheet_core::normalize::normalize_all;
use calsheet_core::row::load_rows;
use calsheet_core::{CalendarDocument, Settings, paginate};

use crate::render::render_document;

pub fn run(csv: &Path, page_size: usize, page: Option<usize>, settings: &Settings) -> Result<()> {
    let html = render_csv(csv, page_size, page, settings)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", html).context("Failed to write HTML")?;
    Ok(())
}

/// Build the whole HTML document before anything is written.
pub fn render_csv(
    csv: &Path,
    page_size: usize,
    page: Option<usize>,
    settings: &Settings,
) -> Result<String> {
    let rows = load_rows(csv).with_context(|| format!("Failed to read {}", csv.display()))?;
    let events = normalize_all(&rows, settings)
        .with_context(|| format!("Failed to process {}", csv.display()))?;

    let pages = paginate(&events, page_size, page)?;
    let document = CalendarDocument::new(pages, settings)?;
    log::info!(
        "Rendering {} events on {} page(s)",
        document.event_count(),
        document.pages.len()
    );

    Ok(render_document(&document).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calsheet_core::CalsheetError;
    use std::fs;

    const CSV: &str = "\
DATE,START,END,TITLE,TYPE,ICON
2024-03-05,2024-03-05T15:00,2024-03-05T17:00,Team Sync,Meeting,missing
2024-03-06,09:00,,Standup,Meeting,
2024-03-07,2024-03-07T12:30,,Lunch,Social,
";

    fn write_csv(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("events.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    fn settings(dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.icon.dir = dir.join("icons");
        settings
    }

    #[test]
    fn renders_every_row_despite_missing_icon() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = write_csv(tmp.path(), CSV);

        let html = render_csv(&csv, 2, None, &settings(tmp.path())).unwrap();
        assert_eq!(html.matches("<li class=\"event\"").count(), 3);
        assert_eq!(html.matches("class=\"page\"").count(), 2);
        assert!(html.contains("3:00PM-5:00PM"));
        assert!(html.contains("<h1>March 2024</h1>"));
    }

    #[test]
    fn single_page_filter() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = write_csv(tmp.path(), CSV);

        let html = render_csv(&csv, 2, Some(2), &settings(tmp.path())).unwrap();
        assert_eq!(html.matches("<li class=\"event\"").count(), 1);
        assert!(html.contains("Lunch"));
        assert!(!html.contains("Standup"));
    }

    #[test]
    fn page_out_of_range_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = write_csv(tmp.path(), CSV);

        let err = render_csv(&csv, 2, Some(3), &settings(tmp.path())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalsheetError>(),
            Some(CalsheetError::PageOutOfRange { page: 3, total: 2 })
        ));
    }

    #[test]
    fn bad_date_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = write_csv(tmp.path(), "DATE,START,TITLE,TYPE\nsoon,09:00,Standup,Meeting\n");

        let err = render_csv(&csv, 8, None, &settings(tmp.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Row 1: invalid DATE value 'soon'"), "{:#}", err);
    }

    #[test]
    fn header_only_csv_has_nothing_to_render() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = write_csv(tmp.path(), "DATE,START,TITLE,TYPE\n");

        let err = render_csv(&csv, 8, None, &settings(tmp.path())).unwrap_err();
        assert!(matches!(err.downcast_ref::<CalsheetError>(), Some(CalsheetError::NoEvents)));
    }
}
