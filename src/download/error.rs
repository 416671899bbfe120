//! Error types for the download module.
//!
//! Display strings double as the per-reference report vocabulary, so the
//! formats here are part of the output contract (e.g. `HTTP error: 404`,
//! `Not a valid PDF file`).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching and validating a PDF.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP error: {status}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response content type was not PDF-like and the body was too
    /// small to keep anyway.
    #[error("Not a PDF file (content-type: {content_type})")]
    NotPdfContentType {
        /// The URL that was fetched.
        url: String,
        /// The offending content type (may be empty).
        content_type: String,
    },

    /// The written file was below the plausibility size floor.
    #[error("Downloaded file too small")]
    TooSmall {
        /// Path of the deleted file.
        path: PathBuf,
        /// Size that failed the floor.
        bytes: u64,
    },

    /// The written file does not start with the `%PDF` signature.
    #[error("Not a valid PDF file")]
    BadSignature {
        /// Path of the deleted file.
        path: PathBuf,
    },

    /// Network-level failure (DNS, connect, TLS, timeout, mid-stream).
    #[error("Download error: {source}")]
    Transport {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// File system error during download (create file, write, etc.)
    #[error("Download error: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed.
    #[error("Download error: invalid URL '{url}'")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a rejected-content-type error.
    pub fn not_pdf(url: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::NotPdfContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an undersized-file error.
    pub fn too_small(path: impl Into<PathBuf>, bytes: u64) -> Self {
        Self::TooSmall {
            path: path.into(),
            bytes,
        }
    }

    /// Creates a bad-signature error.
    pub fn bad_signature(path: impl Into<PathBuf>) -> Self {
        Self::BadSignature { path: path.into() }
    }

    /// Creates a transport error from a reqwest error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

// Note on From trait implementations: no blanket `From<reqwest::Error>` or
// `From<std::io::Error>` because the variants require context (url, path)
// that the source errors don't carry. The helper constructors are the
// intended construction path.
