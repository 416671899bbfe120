//! Reference extraction from tabular spreadsheet input.
//!
//! This module turns raw spreadsheet rows into a cleaned list of
//! [`Reference`] values: one DOI plus an optional fallback PDF link per
//! retained row.
//!
//! # Contract
//!
//! - The DOI column is located by case-insensitive substring match on
//!   `"doi"` among the headers; a missing column degrades to an empty
//!   result, never a hard failure.
//! - A row is retained iff its DOI cell contains a DOI-shaped substring
//!   (`10.\d{4,}[/.].+` after trimming); other rows are dropped entirely.
//! - The optional `Link to PDF` column supplies a fallback URL, kept only
//!   when the cell is a string starting with `http://` or `https://`.
//! - Row alignment is preserved: the fallback URL at position `i` comes
//!   from the same source row as the DOI at position `i`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use oaharvest::parser::{extract_references, load_sheet};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = load_sheet(Path::new("references.xlsx"))?;
//! let extracted = extract_references(&sheet);
//! println!("{extracted}");
//! # Ok(())
//! # }
//! ```

mod doi;
mod error;
mod reference;
mod sheet;

pub use doi::extract_doi;
pub use error::SheetError;
pub use reference::{ExtractResult, Reference};
pub use sheet::{Cell, Sheet, load_sheet};

use tracing::{debug, info, warn};

/// Header of the optional fallback-link column.
const LINK_COLUMN_HEADER: &str = "Link to PDF";

/// Extracts cleaned references from a loaded spreadsheet.
#[tracing::instrument(skip(sheet), fields(rows = sheet.row_count()))]
#[must_use]
pub fn extract_references(sheet: &Sheet) -> ExtractResult {
    let total_rows = sheet.row_count();

    let Some(doi_column) = find_doi_column(&sheet.headers) else {
        warn!("No DOI column found in the spreadsheet; no references to process");
        return ExtractResult::empty(total_rows);
    };
    info!(
        column = %sheet.headers[doi_column],
        "Using column for DOIs"
    );

    let link_column = find_link_column(&sheet.headers);
    if link_column.is_none() {
        debug!("No '{LINK_COLUMN_HEADER}' column; fallback links unavailable");
    }

    let mut references = Vec::new();
    for (row_index, row) in sheet.rows.iter().enumerate() {
        let Some(doi) = row
            .get(doi_column)
            .and_then(Cell::render)
            .and_then(extract_doi)
        else {
            debug!(row = row_index, "Row has no DOI-shaped cell; dropped");
            continue;
        };

        let fallback_url = link_column
            .and_then(|index| row.get(index))
            .and_then(clean_fallback_url);

        references.push(Reference::new(doi, fallback_url));
    }

    info!(
        valid = references.len(),
        total = total_rows,
        "Reference extraction complete"
    );

    ExtractResult {
        references,
        total_rows,
    }
}

/// Finds the DOI column by case-insensitive substring match on the headers.
fn find_doi_column(headers: &[String]) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().to_lowercase().contains("doi"))
}

/// Finds the fallback-link column by case-insensitive exact header match.
fn find_link_column(headers: &[String]) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(LINK_COLUMN_HEADER))
}

/// Validates a fallback-link cell: string cells with a web URL only.
fn clean_fallback_url(cell: &Cell) -> Option<String> {
    let link = cell.as_text()?.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        Some(link.to_string())
    } else {
        None
    }
}
