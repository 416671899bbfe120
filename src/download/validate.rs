//! PDF plausibility checks for downloaded files.

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Files below this size are rejected as implausible PDFs.
pub const MIN_PDF_BYTES: u64 = 1000;

/// The 4-byte ASCII marker at the start of every valid PDF.
pub const PDF_MAGIC: [u8; 4] = *b"%PDF";

/// Result of the advisory signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The file starts with `%PDF`.
    Valid,
    /// The file starts with something else.
    Invalid,
    /// The file could not be re-read; the check is advisory, so the caller
    /// keeps the file.
    Unreadable,
}

/// Reads the first four bytes of `path` and compares them to [`PDF_MAGIC`].
pub async fn check_pdf_signature(path: &Path) -> SignatureCheck {
    let Ok(mut file) = tokio::fs::File::open(path).await else {
        return SignatureCheck::Unreadable;
    };

    let mut header = [0u8; 4];
    match file.read_exact(&mut header).await {
        Ok(_) => {
            if header == PDF_MAGIC {
                SignatureCheck::Valid
            } else {
                SignatureCheck::Invalid
            }
        }
        Err(_) => SignatureCheck::Unreadable,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_signature_valid_for_pdf_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.pdf");
        tokio::fs::write(&path, b"%PDF-1.7 rest of file")
            .await
            .unwrap();

        assert_eq!(check_pdf_signature(&path).await, SignatureCheck::Valid);
    }

    #[tokio::test]
    async fn test_signature_invalid_for_html_body() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.pdf");
        tokio::fs::write(&path, b"<html><body>nope</body></html>")
            .await
            .unwrap();

        assert_eq!(check_pdf_signature(&path).await, SignatureCheck::Invalid);
    }

    #[tokio::test]
    async fn test_signature_unreadable_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.pdf");

        assert_eq!(check_pdf_signature(&path).await, SignatureCheck::Unreadable);
    }
}
