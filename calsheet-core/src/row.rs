//! CSV row loading.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::CalsheetResult;

/// One CSV record. Empty optional cells deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceRow {
    #[serde(rename = "DATE")]
    pub date: String,
    #[serde(rename = "START")]
    pub start: String,
    #[serde(rename = "END", default)]
    pub end: Option<String>,
    #[serde(rename = "TITLE")]
    pub title: String,
    #[serde(rename = "SUBTITLE", default)]
    pub subtitle: Option<String>,
    #[serde(rename = "TYPE")]
    pub event_type: String,
    #[serde(rename = "SUBTYPE", default)]
    pub subtype: Option<String>,
    #[serde(rename = "ICON", default)]
    pub icon: Option<String>,
    /// COLOR, or HEX when COLOR is missing or empty
    #[serde(rename = "COLOR", default)]
    pub color: Option<String>,
    /// Older spelling of COLOR, folded into `color` when rows are read
    #[serde(rename = "HEX", default)]
    pub hex: Option<String>,
    #[serde(rename = "LOCATION", default)]
    pub location: Option<String>,
    #[serde(rename = "DESC", default)]
    pub description: Option<String>,
}

impl SourceRow {
    fn fold_hex(mut self) -> Self {
        let hex = self.hex.take();
        if non_empty(&self.color).is_none() {
            self.color = hex;
        }
        self
    }
}

/// Load every row of a CSV file, in file order.
pub fn load_rows(path: &Path) -> CalsheetResult<Vec<SourceRow>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_rows(reader)
}

/// Read rows from any CSV source with a header line.
pub fn read_rows<R: Read>(source: R) -> CalsheetResult<Vec<SourceRow>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    collect_rows(reader)
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> CalsheetResult<Vec<SourceRow>> {
    let rows = reader
        .deserialize::<SourceRow>()
        .map(|row| row.map(SourceRow::fold_hex))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Loaded {} rows", rows.len());
    Ok(rows)
}

/// Treat `Some("")` like `None`.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
