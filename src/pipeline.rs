//! Sequential per-reference processing loop.
//!
//! The pipeline drives the reference list one at a time: resolve a PDF URL
//! through the chain, derive the DOI-based destination path, download and
//! validate, and record the outcome. Failures never terminate the loop;
//! every input reference yields exactly one report row, in input order.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::download::{PdfFetcher, pdf_filename_for_doi};
use crate::parser::Reference;
use crate::report::{DownloadStatus, ReferenceReport};
use crate::resolver::ResolverChain;

/// Error message recorded when no source produced a URL.
const NO_URL_MESSAGE: &str = "No PDF URL found";

/// Drives references through resolution and download.
pub struct Pipeline {
    chain: ResolverChain,
    fetcher: PdfFetcher,
    output_dir: PathBuf,
}

impl Pipeline {
    /// Creates a pipeline writing downloads under `output_dir`.
    #[must_use]
    pub fn new(chain: ResolverChain, fetcher: PdfFetcher, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            chain,
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    /// Processes all references sequentially, in input order.
    pub async fn process(&self, references: &[Reference]) -> Vec<ReferenceReport> {
        let mut reports = Vec::with_capacity(references.len());
        for reference in references {
            reports.push(self.process_reference(reference).await);
        }
        reports
    }

    /// Processes a single reference into its report row.
    ///
    /// The row starts as `Not attempted`; resolution and download outcomes
    /// are folded in. Never fails: every fault lands in the row instead.
    #[tracing::instrument(skip(self, reference), fields(doi = %reference.doi))]
    pub async fn process_reference(&self, reference: &Reference) -> ReferenceReport {
        let mut report = ReferenceReport::new(&reference.doi);
        debug!("processing reference");

        let Some(resolved) = self.chain.resolve(reference).await else {
            report.download_status = DownloadStatus::Failed;
            report.error_message = Some(NO_URL_MESSAGE.to_string());
            warn!("no PDF found for reference");
            return report;
        };

        report.pdf_found = true;
        report.source = Some(resolved.source.clone());

        let dest = self.output_dir.join(pdf_filename_for_doi(&reference.doi));
        match self.fetcher.fetch(&resolved.url, &dest).await {
            Ok(downloaded) => {
                report.download_status = DownloadStatus::Success;
                report.file_path = Some(downloaded.path.display().to_string());
                info!(
                    source = %resolved.source,
                    path = %downloaded.path.display(),
                    detail = downloaded.note.message(),
                    "reference downloaded"
                );
            }
            Err(error) => {
                report.download_status = DownloadStatus::Failed;
                report.error_message = Some(error.to_string());
                warn!(source = %resolved.source, error = %error, "download failed");
            }
        }

        report
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("chain", &self.chain)
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::{ResolveOutcome, Resolver};
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use async_trait::async_trait;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedResolver {
        tag: &'static str,
        url: Option<String>,
    }

    #[async_trait]
    impl Resolver for FixedResolver {
        fn name(&self) -> &str {
            self.tag
        }

        fn can_handle(&self, _reference: &Reference) -> bool {
            true
        }

        async fn resolve(&self, _reference: &Reference) -> ResolveOutcome {
            match &self.url {
                Some(url) => ResolveOutcome::found(url.clone()),
                None => ResolveOutcome::not_found(),
            }
        }
    }

    fn chain_with(tag: &'static str, url: Option<String>) -> ResolverChain {
        let mut chain = ResolverChain::new();
        chain.register(Box::new(FixedResolver { tag, url }));
        chain
    }

    async fn mount_pdf(server: &MockServer, route: &str) {
        let mut body = b"%PDF-1.7\n".to_vec();
        body.resize(2048, b'x');
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(body),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_pipeline_success_fills_report() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        mount_pdf(&mock_server, "/paper.pdf").await;

        let chain = chain_with("Unpaywall", Some(format!("{}/paper.pdf", mock_server.uri())));
        let pipeline = Pipeline::new(chain, PdfFetcher::new(), temp_dir.path());

        let report = pipeline
            .process_reference(&Reference::new("10.1038/s41586-020-2649-2", None))
            .await;

        assert!(report.pdf_found);
        assert_eq!(report.source.as_deref(), Some("Unpaywall"));
        assert_eq!(report.download_status, DownloadStatus::Success);
        let file_path = report.file_path.unwrap();
        assert!(
            file_path.ends_with("10.1038_s41586-020-2649-2.pdf"),
            "destination derives from the DOI: {file_path}"
        );
        assert!(report.error_message.is_none());
    }

    #[tokio::test]
    async fn test_pipeline_no_url_marks_failed() {
        let temp_dir = TempDir::new().unwrap();
        let chain = chain_with("Unpaywall", None);
        let pipeline = Pipeline::new(chain, PdfFetcher::new(), temp_dir.path());

        let report = pipeline
            .process_reference(&Reference::new("10.1234/missing", None))
            .await;

        assert!(!report.pdf_found);
        assert!(report.source.is_none());
        assert_eq!(report.download_status, DownloadStatus::Failed);
        assert_eq!(report.error_message.as_deref(), Some("No PDF URL found"));
        assert!(report.file_path.is_none());
    }

    #[tokio::test]
    async fn test_pipeline_download_404_recorded_per_reference() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/gone.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let chain = chain_with("PubMed", Some(format!("{}/gone.pdf", mock_server.uri())));
        let pipeline = Pipeline::new(chain, PdfFetcher::new(), temp_dir.path());

        let report = pipeline
            .process_reference(&Reference::new("10.1234/gone", None))
            .await;

        assert!(report.pdf_found, "URL was found even though download failed");
        assert_eq!(report.download_status, DownloadStatus::Failed);
        assert_eq!(report.error_message.as_deref(), Some("HTTP error: 404"));
        assert!(report.file_path.is_none());
    }

    #[tokio::test]
    async fn test_pipeline_processes_all_references_in_order() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        mount_pdf(&mock_server, "/ok.pdf").await;

        let chain = chain_with("Unpaywall", Some(format!("{}/ok.pdf", mock_server.uri())));
        let pipeline = Pipeline::new(chain, PdfFetcher::new(), temp_dir.path());

        let references = vec![
            Reference::new("10.1234/first", None),
            Reference::new("10.1234/second", None),
            Reference::new("10.1234/third", None),
        ];
        let reports = pipeline.process(&references).await;

        assert_eq!(reports.len(), 3, "one report per reference");
        assert_eq!(reports[0].doi, "10.1234/first");
        assert_eq!(reports[1].doi, "10.1234/second");
        assert_eq!(reports[2].doi, "10.1234/third");
    }
}
