//! Constants for the download module (timeouts, validation thresholds).

/// Default HTTP connect timeout for downloads (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout for downloads (30 seconds; PDFs are small).
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Content-type markers accepted for streaming straight to disk.
///
/// Servers frequently mislabel PDFs; anything matching one of these
/// substrings is treated as a plausible binary payload.
pub const ACCEPTED_CONTENT_TYPE_MARKERS: [&str; 4] = ["pdf", "octet-stream", "binary", "download"];

/// Accept header sent with download requests.
pub const PDF_ACCEPT: &str = "application/pdf,application/octet-stream,*/*";
