//! HTTP PDF fetcher with streaming, content-type policy, and validation.
//!
//! The fetcher downloads a URL to a caller-specified path and keeps the
//! file only when the bytes plausibly represent a PDF. After any call,
//! either no file exists at the destination, or it passed the size floor
//! and (advisorily) the `%PDF` signature check.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{
    ACCEPTED_CONTENT_TYPE_MARKERS, CONNECT_TIMEOUT_SECS, PDF_ACCEPT, READ_TIMEOUT_SECS,
};
use super::error::DownloadError;
use super::validate::{MIN_PDF_BYTES, SignatureCheck, check_pdf_signature};

/// Browser User-Agent sent with every download request.
///
/// Deliberate workaround for repository and publisher servers that block
/// unrecognized clients; lookup traffic identifies the tool instead.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Outcome annotation for a kept download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadNote {
    /// Accepted content type, size floor passed, signature valid.
    Clean,
    /// Unrecognized content type but the body was large enough to keep.
    UnknownContentType,
    /// The advisory signature check could not be performed; file kept.
    SignatureUnchecked,
}

impl DownloadNote {
    /// Operator-facing success message for this outcome.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Clean => "Successfully downloaded",
            Self::UnknownContentType => "Successfully downloaded (unknown content type)",
            Self::SignatureUnchecked => "Successfully downloaded (signature check failed)",
        }
    }
}

/// A kept download.
#[derive(Debug, Clone)]
pub struct Downloaded {
    /// Final output path.
    pub path: PathBuf,
    /// File size in bytes.
    pub bytes: u64,
    /// How clean the validation outcome was.
    pub note: DownloadNote,
}

/// HTTP client for fetching PDFs with streaming support.
///
/// Created once and reused across references to benefit from connection
/// pooling.
#[derive(Debug, Clone)]
pub struct PdfFetcher {
    client: Client,
}

impl Default for PdfFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfFetcher {
    /// Creates a fetcher with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a fetcher with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied timeout
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads `url` to `dest`, keeping the file only if it plausibly
    /// holds a PDF.
    ///
    /// The destination path is fully determined by the caller; no filename
    /// negotiation happens here.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the URL is invalid, the server
    /// answers with a non-success status, the payload fails the
    /// content-type/size/signature policy, or a transport/write fault
    /// occurs. Partial files are removed before returning an error.
    #[must_use = "download result reports whether a file was kept"]
    #[instrument(skip(self), fields(url = %url, dest = %dest.display()))]
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<Downloaded, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        debug!("starting download");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, PDF_ACCEPT)
            .send()
            .await
            .map_err(|e| DownloadError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "download request failed");
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        debug!(content_type = %content_type, "inspecting response content type");

        if !is_accepted_content_type(&content_type) {
            return self.keep_unknown_content_type(response, url, dest, &content_type).await;
        }

        // Accepted content type: stream the body to disk incrementally.
        let mut file = File::create(dest)
            .await
            .map_err(|e| DownloadError::io(dest, e))?;

        let stream_result = stream_to_file(&mut file, response, url, dest).await;
        drop(file);

        let bytes_written = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %dest.display(), "cleaning up partial file after stream error");
                remove_file_best_effort(dest).await;
                return Err(e);
            }
        };

        self.validate_written(url, dest, bytes_written).await
    }

    /// Unknown content type: buffer the body and keep it only when it is
    /// large enough to plausibly be a real document.
    async fn keep_unknown_content_type(
        &self,
        response: reqwest::Response,
        url: &str,
        dest: &Path,
        content_type: &str,
    ) -> Result<Downloaded, DownloadError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::transport(url, e))?;

        if body.len() as u64 > MIN_PDF_BYTES {
            if let Err(e) = tokio::fs::write(dest, &body).await {
                remove_file_best_effort(dest).await;
                return Err(DownloadError::io(dest, e));
            }
            warn!(
                content_type = %content_type,
                bytes = body.len(),
                "kept download despite unrecognized content type"
            );
            return Ok(Downloaded {
                path: dest.to_path_buf(),
                bytes: body.len() as u64,
                note: DownloadNote::UnknownContentType,
            });
        }

        debug!(
            content_type = %content_type,
            bytes = body.len(),
            "rejecting small body with unrecognized content type"
        );
        Err(DownloadError::not_pdf(url, content_type))
    }

    /// Post-write validation: size floor, then advisory signature check.
    async fn validate_written(
        &self,
        url: &str,
        dest: &Path,
        bytes_written: u64,
    ) -> Result<Downloaded, DownloadError> {
        let size = tokio::fs::metadata(dest)
            .await
            .map(|meta| meta.len())
            .unwrap_or(bytes_written);

        if size < MIN_PDF_BYTES {
            warn!(path = %dest.display(), bytes = size, "downloaded file too small; removing");
            remove_file_best_effort(dest).await;
            return Err(DownloadError::too_small(dest, size));
        }

        match check_pdf_signature(dest).await {
            SignatureCheck::Valid => {
                info!(path = %dest.display(), bytes = size, "download complete");
                Ok(Downloaded {
                    path: dest.to_path_buf(),
                    bytes: size,
                    note: DownloadNote::Clean,
                })
            }
            SignatureCheck::Invalid => {
                warn!(path = %dest.display(), "missing %PDF signature; removing");
                remove_file_best_effort(dest).await;
                Err(DownloadError::bad_signature(dest))
            }
            SignatureCheck::Unreadable => {
                // Advisory check only: the already-written file stands.
                warn!(path = %dest.display(), url = %url, "signature check could not run; keeping file");
                Ok(Downloaded {
                    path: dest.to_path_buf(),
                    bytes: size,
                    note: DownloadNote::SignatureUnchecked,
                })
            }
        }
    }
}

/// Streams the response body to `file`, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::transport(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn is_accepted_content_type(content_type: &str) -> bool {
    ACCEPTED_CONTENT_TYPE_MARKERS
        .iter()
        .any(|marker| content_type.contains(marker))
}

async fn remove_file_best_effort(path: &Path) {
    let _ = tokio::fs::remove_file(path).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{header, headers, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn pdf_body(len: usize) -> Vec<u8> {
        let mut body = b"%PDF-1.7\n".to_vec();
        body.resize(len, b'x');
        body
    }

    #[test]
    fn test_is_accepted_content_type_markers() {
        assert!(is_accepted_content_type("application/pdf"));
        assert!(is_accepted_content_type("application/octet-stream"));
        assert!(is_accepted_content_type("binary/weird"));
        assert!(is_accepted_content_type("application/x-download"));
        assert!(!is_accepted_content_type("text/html"));
        assert!(!is_accepted_content_type(""));
    }

    #[test]
    fn test_download_note_messages() {
        assert_eq!(DownloadNote::Clean.message(), "Successfully downloaded");
        assert_eq!(
            DownloadNote::UnknownContentType.message(),
            "Successfully downloaded (unknown content type)"
        );
        assert_eq!(
            DownloadNote::SignatureUnchecked.message(),
            "Successfully downloaded (signature check failed)"
        );
    }

    #[tokio::test]
    async fn test_fetch_valid_pdf_succeeds() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("paper.pdf");

        Mock::given(method("GET"))
            .and(path("/paper.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(pdf_body(1500)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/paper.pdf", mock_server.uri());
        let downloaded = fetcher.fetch(&url, &dest).await.unwrap();

        assert_eq!(downloaded.note, DownloadNote::Clean);
        assert_eq!(downloaded.bytes, 1500);
        assert!(dest.exists());
        let contents = std::fs::read(&dest).unwrap();
        assert!(contents.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_fetch_404_writes_nothing() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("missing.pdf");

        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/missing.pdf", mock_server.uri());
        let result = fetcher.fetch(&url, &dest).await;

        match result {
            Err(DownloadError::HttpStatus { status: 404, .. }) => {}
            other => panic!("Expected HttpStatus 404, got: {other:?}"),
        }
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404",
            "report message contract"
        );
        assert!(!dest.exists(), "no file may be written on HTTP error");
    }

    #[tokio::test]
    async fn test_fetch_large_body_with_unknown_content_type_kept() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("mislabeled.pdf");

        Mock::given(method("GET"))
            .and(path("/mislabeled"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_bytes(pdf_body(4096)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/mislabeled", mock_server.uri());
        let downloaded = fetcher.fetch(&url, &dest).await.unwrap();

        assert_eq!(downloaded.note, DownloadNote::UnknownContentType);
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_small_body_with_unknown_content_type_rejected() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("tiny.pdf");

        Mock::given(method("GET"))
            .and(path("/tiny"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<html>error page</html>".to_vec()),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/tiny", mock_server.uri());
        let result = fetcher.fetch(&url, &dest).await;

        match &result {
            Err(DownloadError::NotPdfContentType { content_type, .. }) => {
                assert!(content_type.contains("text/html"));
            }
            other => panic!("Expected NotPdfContentType, got: {other:?}"),
        }
        assert!(!dest.exists(), "small unknown-type body must not be kept");
    }

    #[tokio::test]
    async fn test_fetch_undersized_pdf_deleted() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("small.pdf");

        Mock::given(method("GET"))
            .and(path("/small.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(pdf_body(100)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/small.pdf", mock_server.uri());
        let result = fetcher.fetch(&url, &dest).await;

        match result {
            Err(DownloadError::TooSmall { bytes, .. }) => assert_eq!(bytes, 100),
            other => panic!("Expected TooSmall, got: {other:?}"),
        }
        assert!(!dest.exists(), "undersized file must be deleted");
    }

    #[tokio::test]
    async fn test_fetch_bad_signature_deleted() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("fake.pdf");

        let mut body = b"<html>definitely not a pdf".to_vec();
        body.resize(1500, b'x');

        Mock::given(method("GET"))
            .and(path("/fake.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(body),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/fake.pdf", mock_server.uri());
        let result = fetcher.fetch(&url, &dest).await;

        match &result {
            Err(DownloadError::BadSignature { .. }) => {}
            other => panic!("Expected BadSignature, got: {other:?}"),
        }
        assert_eq!(
            result.unwrap_err().to_string(),
            "Not a valid PDF file",
            "report message contract"
        );
        assert!(!dest.exists(), "signature-invalid file must be deleted");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("x.pdf");
        let fetcher = PdfFetcher::new();

        let result = fetcher.fetch("not-a-valid-url", &dest).await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_ua_and_pdf_accept() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("ua.pdf");

        Mock::given(method("GET"))
            .and(path("/ua.pdf"))
            .and(header("user-agent", BROWSER_USER_AGENT))
            // wiremock 0.6's exact `header` matcher splits the request's
            // comma-separated value into a list, so a single-string matcher
            // for `PDF_ACCEPT` never matches; `headers` compares the same
            // value token-by-token, preserving the original expectation.
            .and(headers(
                "accept",
                PDF_ACCEPT.split(',').collect::<Vec<_>>(),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(pdf_body(2000)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new();
        let url = format!("{}/ua.pdf", mock_server.uri());
        let result = fetcher.fetch(&url, &dest).await;
        assert!(
            result.is_ok(),
            "browser UA and Accept header must be sent: {result:?}"
        );
    }

    #[tokio::test]
    async fn test_fetch_read_timeout_cleans_up_partial_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("slow.pdf");

        Mock::given(method("GET"))
            .and(path("/slow.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(pdf_body(2000))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = PdfFetcher::new_with_timeouts(10, 1);
        let url = format!("{}/slow.pdf", mock_server.uri());
        let result = fetcher.fetch(&url, &dest).await;

        assert!(result.is_err(), "expected timeout or transport error");
        assert!(
            !dest.exists(),
            "partial file must be cleaned up after stream error"
        );
    }
}
