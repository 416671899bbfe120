//! PubMed resolver - full-text lookup via the NCBI PMC citation exporter.
//!
//! The [`PubMedResolver`] queries the NCBI literature citation exporter for
//! a PMC full-text URL by DOI. URLs lacking a `.pdf` suffix get one
//! appended as a best-effort heuristic; the download validator catches
//! wrong guesses.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::Reference;

use super::http_client::{build_lookup_http_client, standard_user_agent};
use super::{ResolveError, ResolveOutcome, Resolver};

/// Default NCBI citation exporter base URL for PMC records.
const DEFAULT_BASE_URL: &str = "https://api.ncbi.nlm.nih.gov/lit/ctxp/v1/pmc";

/// Source tag reported for PMC exporter hits.
const SOURCE_NAME: &str = "PubMed";

// ==================== Citation Exporter Response Types ====================

/// The subset of the citation exporter response carrying full-text URLs.
#[derive(Debug, Deserialize)]
pub(crate) struct CitationResponse {
    pub full_text_url: Option<String>,
    pub pdf_url: Option<String>,
}

// ==================== PubMedResolver ====================

/// Resolves DOIs to PMC full-text PDF URLs via the NCBI citation exporter.
pub struct PubMedResolver {
    client: Client,
    base_url: String,
}

impl PubMedResolver {
    /// Creates a resolver against the production NCBI endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if HTTP client construction fails.
    pub fn new(timeout_secs: u64) -> Result<Self, ResolveError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs)
    }

    /// Creates a resolver with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if HTTP client construction fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ResolveError> {
        let client =
            build_lookup_http_client(SOURCE_NAME, standard_user_agent("pubmed"), timeout_secs)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl std::fmt::Debug for PubMedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubMedResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for PubMedResolver {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn can_handle(&self, _reference: &Reference) -> bool {
        true
    }

    #[tracing::instrument(skip(self, reference), fields(resolver = "pubmed", doi = %reference.doi))]
    async fn resolve(&self, reference: &Reference) -> ResolveOutcome {
        let doi = &reference.doi;
        // The exporter accepts the DOI as a raw path tail; slashes included.
        let url = format!("{}/{doi}", self.base_url.trim_end_matches('/'));

        debug!(api_url = %url, "Calling PMC citation exporter");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "PMC citation exporter request failed");
                return ResolveOutcome::miss(ResolveError::unreachable(
                    SOURCE_NAME,
                    doi,
                    e.to_string(),
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "PMC exporter returned non-success");
            return ResolveOutcome::miss(ResolveError::status(SOURCE_NAME, doi, status.as_u16()));
        }

        let body = match response.json::<CitationResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Failed to parse PMC exporter response JSON");
                return ResolveOutcome::miss(ResolveError::malformed(
                    SOURCE_NAME,
                    doi,
                    e.to_string(),
                ));
            }
        };

        match body.full_text_url.or(body.pdf_url) {
            Some(pdf_url) => {
                let pdf_url = ensure_pdf_suffix(pdf_url);
                debug!(pdf_url = %pdf_url, "Found full-text URL in PMC exporter response");
                ResolveOutcome::found(pdf_url)
            }
            None => {
                debug!("PMC exporter response has no full-text URL");
                ResolveOutcome::miss(ResolveError::no_pdf_location(SOURCE_NAME, doi))
            }
        }
    }
}

/// Appends `.pdf` when the URL does not already end in it.
///
/// Best-effort heuristic only; the resulting URL is not validated against
/// actual content.
fn ensure_pdf_suffix(url: String) -> String {
    if url.to_lowercase().ends_with(".pdf") {
        url
    } else {
        format!("{url}.pdf")
    }
}
