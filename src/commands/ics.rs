use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use calsheet_core::Settings;
use calsheet_core::ics::{generate_ics, to_calendar_event_records};
use calsheet_core::row::load_rows;

pub fn run(csv: &Path, internal: bool, settings: &Settings) -> Result<()> {
    let ics = export_csv(csv, internal, settings)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(ics.as_bytes()).context("Failed to write calendar")?;
    Ok(())
}

/// Build the full calendar text; any bad row fails the export.
pub fn export_csv(csv: &Path, internal: bool, settings: &Settings) -> Result<String> {
    let rows = load_rows(csv).with_context(|| format!("Failed to read {}", csv.display()))?;
    let records = to_calendar_event_records(&rows, internal, settings)
        .with_context(|| format!("Failed to process {}", csv.display()))?;

    generate_ics(&records).context("Failed to generate calendar")
}
