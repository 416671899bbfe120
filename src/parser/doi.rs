//! DOI extraction from spreadsheet cells.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern for DOI-shaped cell content: `10.` followed by a registrant code
/// of 4+ digits, a `/` or `.` separator, and a non-empty suffix. The match
/// runs to the end of the cell (DOI suffixes may contain almost anything).
#[allow(clippy::expect_used)]
static DOI_CELL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"10\.\d{4,}[/.].+").expect("DOI cell regex is valid") // Static pattern, safe to panic
});

/// Extracts the DOI-shaped substring from a spreadsheet cell.
///
/// The cell is trimmed first; the first match of the DOI pattern is
/// returned. Cells with no match yield `None` and the row is dropped by
/// the extractor.
///
/// # Examples
///
/// ```
/// use oaharvest::parser::extract_doi;
///
/// assert_eq!(
///     extract_doi(" 10.1038/s41586-020-2649-2 "),
///     Some("10.1038/s41586-020-2649-2".to_string())
/// );
/// assert_eq!(extract_doi("n/a"), None);
/// ```
#[must_use]
pub fn extract_doi(cell: &str) -> Option<String> {
    DOI_CELL_PATTERN
        .find(cell.trim())
        .map(|m| m.as_str().to_string())
}
