//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use oaharvest::resolver::DEFAULT_LOOKUP_TIMEOUT_SECS;

/// Resolve bibliographic references to open-access PDFs and download them.
///
/// oaharvest reads a spreadsheet of references (one DOI per row, optional
/// "Link to PDF" column), queries open-access lookup services in priority
/// order, downloads and validates the PDFs, and writes a per-reference CSV
/// report.
#[derive(Parser, Debug)]
#[command(name = "oaharvest")]
#[command(author, version, about)]
pub struct Args {
    /// Reference spreadsheet (.xlsx, .xls or .csv) with a DOI column
    pub input: PathBuf,

    /// Directory for downloaded PDFs (created if absent)
    #[arg(short = 'o', long, default_value = "pdfs")]
    pub output_dir: PathBuf,

    /// Path of the per-reference CSV report
    #[arg(short = 'r', long, default_value = "results.csv")]
    pub report: PathBuf,

    /// Contact email sent to the Unpaywall API
    #[arg(short = 'e', long, default_value = "oaharvest@example.com")]
    pub email: String,

    /// Diagnostic log file (truncated at startup, debug-level trace)
    #[arg(long, default_value = "oaharvest.log")]
    pub log_file: PathBuf,

    /// Lookup request timeout in seconds (1-300)
    #[arg(long, default_value_t = DEFAULT_LOOKUP_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub lookup_timeout: u64,

    /// Download request timeout in seconds (1-3600)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub download_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
