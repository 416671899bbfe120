//! HTTP PDF fetching with streaming and plausibility validation.
//!
//! This module retrieves bytes from a URL and persists them at a
//! caller-specified path only if they plausibly represent a PDF.
//!
//! # Decision policy
//!
//! - Non-200 responses fail without writing anything.
//! - Accepted content types (pdf/octet-stream/binary/download markers) are
//!   streamed to disk, then checked against a 1000-byte size floor and the
//!   `%PDF` signature; failures delete the file.
//! - Unrecognized content types are kept only when the body exceeds the
//!   size floor, flagged as a caveated success.
//! - Any mid-flight fault removes the partial file.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use oaharvest::download::PdfFetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = PdfFetcher::new();
//! let downloaded = fetcher
//!     .fetch("https://example.com/paper.pdf", Path::new("pdfs/paper.pdf"))
//!     .await?;
//! println!("kept {} bytes: {}", downloaded.bytes, downloaded.note.message());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod validate;

pub use client::{BROWSER_USER_AGENT, DownloadNote, Downloaded, PdfFetcher};
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::pdf_filename_for_doi;
pub use validate::{MIN_PDF_BYTES, PDF_MAGIC, SignatureCheck, check_pdf_signature};
