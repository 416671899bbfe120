//! Error types for spreadsheet loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the reference spreadsheet.
///
/// These errors are non-fatal to the overall run: callers degrade to an
/// empty reference set and continue (the run then reports zero processed).
#[derive(Debug, Error)]
pub enum SheetError {
    /// The file could not be opened or parsed in its claimed format.
    #[error("cannot read spreadsheet '{path}': {reason}\n  Suggestion: {suggestion}")]
    Unreadable {
        /// Path of the input file.
        path: PathBuf,
        /// Why reading failed.
        reason: String,
        /// How to fix the issue.
        suggestion: String,
    },

    /// The file extension is not a supported spreadsheet format.
    #[error(
        "unsupported spreadsheet format '{extension}' for '{path}'\n  Suggestion: Provide a .xlsx, .xls or .csv file"
    )]
    UnsupportedFormat {
        /// Path of the input file.
        path: PathBuf,
        /// The unrecognized extension (empty when the path has none).
        extension: String,
    },

    /// The workbook contains no worksheet to read.
    #[error("no worksheet found in '{path}'\n  Suggestion: Ensure the workbook has at least one sheet")]
    NoWorksheet {
        /// Path of the input file.
        path: PathBuf,
    },
}

impl SheetError {
    /// Creates an `Unreadable` error with a standard suggestion.
    #[must_use]
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            path: path.into(),
            reason: reason.into(),
            suggestion: "Check that the file exists and is a valid spreadsheet".to_string(),
        }
    }

    /// Creates an `UnsupportedFormat` error.
    #[must_use]
    pub fn unsupported_format(path: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            extension: extension.into(),
        }
    }

    /// Creates a `NoWorksheet` error.
    #[must_use]
    pub fn no_worksheet(path: impl Into<PathBuf>) -> Self {
        Self::NoWorksheet { path: path.into() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_error_unreadable_message() {
        let err = SheetError::unreadable("refs.xlsx", "file not found");
        let msg = err.to_string();
        assert!(msg.contains("refs.xlsx"), "should contain path: {msg}");
        assert!(msg.contains("file not found"), "should contain reason: {msg}");
        assert!(msg.contains("Suggestion"), "should have suggestion: {msg}");
    }

    #[test]
    fn test_sheet_error_unsupported_format_message() {
        let err = SheetError::unsupported_format("refs.docx", "docx");
        let msg = err.to_string();
        assert!(msg.contains("docx"), "should contain extension: {msg}");
        assert!(msg.contains(".csv"), "suggestion should list formats: {msg}");
    }

    #[test]
    fn test_sheet_error_no_worksheet_message() {
        let err = SheetError::no_worksheet("empty.xlsx");
        let msg = err.to_string();
        assert!(msg.contains("no worksheet"), "should mention worksheet: {msg}");
        assert!(msg.contains("empty.xlsx"), "should contain path: {msg}");
    }
}
