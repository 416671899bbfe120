//! Spreadsheet loading into a format-agnostic in-memory table.
//!
//! Supports XLSX/XLS workbooks (via calamine) and CSV files (via the csv
//! crate), selected by file extension. The first row is treated as the
//! header row in both formats.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info};

use super::error::SheetError;

/// A single spreadsheet cell.
///
/// The link-column contract only accepts string cells, so the cell model
/// distinguishes text from other value types instead of flattening
/// everything to strings up front.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A textual cell value.
    Text(String),
    /// A non-text value (number, bool, date) rendered for display.
    Other(String),
    /// An empty or error cell.
    Empty,
}

impl Cell {
    /// Renders the cell as text regardless of its original type.
    ///
    /// Empty cells render as `None`.
    #[must_use]
    pub fn render(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Other(s) => Some(s),
            Self::Empty => None,
        }
    }

    /// Returns the cell content only if it was a string cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) | Self::Empty => None,
        }
    }
}

/// An in-memory table: one header row plus data rows.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Column headers from the first row.
    pub headers: Vec<String>,
    /// Data rows, in file order. Rows may be shorter than the header row.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Returns the number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Loads a spreadsheet from disk, dispatching on the file extension.
///
/// # Errors
///
/// Returns [`SheetError`] when the extension is unsupported or the file
/// cannot be opened/parsed. Callers treat this as a degraded empty input,
/// not a fatal condition.
pub fn load_sheet(path: &Path) -> Result<Sheet, SheetError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let sheet = match extension.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        _ => return Err(SheetError::unsupported_format(path, extension)),
    };

    info!(
        path = %path.display(),
        rows = sheet.row_count(),
        columns = sheet.headers.len(),
        "Loaded reference spreadsheet"
    );
    debug!(headers = ?sheet.headers, "Spreadsheet columns");

    Ok(sheet)
}

fn load_workbook(path: &Path) -> Result<Sheet, SheetError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| SheetError::unreadable(path, e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::no_worksheet(path))?
        .map_err(|e| SheetError::unreadable(path, e.to_string()))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header_row| header_row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(Sheet { headers, rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Empty | Data::Error(_) => Cell::Empty,
        other => Cell::Other(other.to_string()),
    }
}

fn load_csv(path: &Path) -> Result<Sheet, SheetError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| SheetError::unreadable(path, e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| SheetError::unreadable(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SheetError::unreadable(path, e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Sheet { headers, rows })
}
