//! Per-reference report rows, CSV output, and run summary counts.
//!
//! Exactly one [`ReferenceReport`] exists per input reference, in input
//! order. Rows are write-once: the pipeline fills them in as it goes and
//! the writer serializes the ordered sequence verbatim.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Download phase outcome for one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DownloadStatus {
    /// No download was attempted (initial state).
    #[serde(rename = "Not attempted")]
    NotAttempted,
    /// A file was downloaded and kept.
    Success,
    /// Resolution or download failed.
    Failed,
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAttempted => write!(f, "Not attempted"),
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// One report row per input reference.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    /// The reference DOI.
    #[serde(rename = "DOI")]
    pub doi: String,
    /// Whether any source produced a PDF URL.
    #[serde(rename = "PDF_Found")]
    pub pdf_found: bool,
    /// Source tag of the resolver that produced the URL.
    #[serde(rename = "Source")]
    pub source: Option<String>,
    /// Outcome of the download phase.
    #[serde(rename = "Download_Status")]
    pub download_status: DownloadStatus,
    /// Path of the kept file, when the download succeeded.
    #[serde(rename = "File_Path")]
    pub file_path: Option<String>,
    /// Failure detail, when something went wrong.
    #[serde(rename = "Error_Message")]
    pub error_message: Option<String>,
}

impl ReferenceReport {
    /// Creates the initial report row for a reference.
    #[must_use]
    pub fn new(doi: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            pdf_found: false,
            source: None,
            download_status: DownloadStatus::NotAttempted,
            file_path: None,
            error_message: None,
        }
    }
}

/// Errors that can occur while persisting the report.
///
/// Report-write failures are logged by the caller and never suppress the
/// console summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The CSV file could not be created or written.
    #[error("cannot write report to '{path}': {source}")]
    Write {
        /// Target report path.
        path: PathBuf,
        /// The underlying CSV/IO error.
        #[source]
        source: csv::Error,
    },
}

impl ReportError {
    fn write(path: &Path, source: csv::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes the ordered report rows as a CSV file.
///
/// # Errors
///
/// Returns [`ReportError`] when the file cannot be created or a row cannot
/// be serialized.
pub fn write_report(path: &Path, reports: &[ReferenceReport]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::write(path, e))?;
    for report in reports {
        writer
            .serialize(report)
            .map_err(|e| ReportError::write(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| ReportError::write(path, csv::Error::from(e)))?;

    info!(path = %path.display(), rows = reports.len(), "Report written");
    Ok(())
}

/// Aggregate counts for the operator summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Total data rows in the input file, including dropped rows.
    pub total_rows: usize,
    /// References that survived extraction (equals report row count).
    pub processed: usize,
    /// Reports with `Download_Status = Success`.
    pub successful: usize,
    /// Reports with any other terminal status.
    pub failed: usize,
}

impl RunSummary {
    /// Computes summary counts from the finished report sequence.
    #[must_use]
    pub fn from_reports(total_rows: usize, reports: &[ReferenceReport]) -> Self {
        let successful = reports
            .iter()
            .filter(|report| report.download_status == DownloadStatus::Success)
            .count();
        Self {
            total_rows,
            processed: reports.len(),
            successful,
            failed: reports.len() - successful,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn success_row(doi: &str) -> ReferenceReport {
        ReferenceReport {
            doi: doi.to_string(),
            pdf_found: true,
            source: Some("Unpaywall".to_string()),
            download_status: DownloadStatus::Success,
            file_path: Some(format!("pdfs/{}.pdf", doi.replace('/', "_"))),
            error_message: None,
        }
    }

    #[test]
    fn test_reference_report_initial_state() {
        let report = ReferenceReport::new("10.1234/test");
        assert_eq!(report.doi, "10.1234/test");
        assert!(!report.pdf_found);
        assert_eq!(report.download_status, DownloadStatus::NotAttempted);
        assert!(report.source.is_none());
        assert!(report.file_path.is_none());
        assert!(report.error_message.is_none());
    }

    #[test]
    fn test_download_status_display() {
        assert_eq!(DownloadStatus::NotAttempted.to_string(), "Not attempted");
        assert_eq!(DownloadStatus::Success.to_string(), "Success");
        assert_eq!(DownloadStatus::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_write_report_columns_and_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");

        let mut failed = ReferenceReport::new("10.1234/second");
        failed.download_status = DownloadStatus::Failed;
        failed.error_message = Some("No PDF URL found".to_string());

        write_report(&path, &[success_row("10.1234/first"), failed]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "DOI,PDF_Found,Source,Download_Status,File_Path,Error_Message"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("10.1234/first,true,Unpaywall,Success,"));
        let second = lines.next().unwrap();
        assert!(second.starts_with("10.1234/second,false,,Failed,"));
        assert!(second.ends_with("No PDF URL found"));
        assert!(lines.next().is_none(), "exactly one row per reference");
    }

    #[test]
    fn test_write_report_serializes_not_attempted_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");

        write_report(&path, &[ReferenceReport::new("10.1234/untouched")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(
            contents.contains("Not attempted"),
            "status spelling must match the report vocabulary: {contents}"
        );
    }

    #[test]
    fn test_write_report_to_bad_path_errors() {
        let result = write_report(
            Path::new("/nonexistent-dir/results.csv"),
            &[success_row("10.1234/x")],
        );
        assert!(matches!(result, Err(ReportError::Write { .. })));
    }

    #[test]
    fn test_run_summary_counts() {
        let mut failed = ReferenceReport::new("10.1234/b");
        failed.download_status = DownloadStatus::Failed;

        let reports = vec![success_row("10.1234/a"), failed];
        let summary = RunSummary::from_reports(5, &reports);

        assert_eq!(summary.total_rows, 5);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_run_summary_counts_not_attempted_as_failed() {
        let reports = vec![ReferenceReport::new("10.1234/a")];
        let summary = RunSummary::from_reports(1, &reports);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 1);
    }
}
