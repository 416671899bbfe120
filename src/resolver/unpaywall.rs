//! Unpaywall resolver - looks up open-access PDF locations by DOI.
//!
//! The [`UnpaywallResolver`] queries the Unpaywall REST API and extracts a
//! PDF URL from the open-access locations in the response. Works that are
//! not flagged open access are treated as not found.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::Reference;

use super::http_client::{build_lookup_http_client, standard_user_agent};
use super::{ResolveError, ResolveOutcome, Resolver};

/// Default Unpaywall API base URL.
const DEFAULT_BASE_URL: &str = "https://api.unpaywall.org/v2";

/// Source tag reported for Unpaywall hits.
const SOURCE_NAME: &str = "Unpaywall";

// ==================== Unpaywall API Response Types ====================

/// Top-level Unpaywall works response.
#[derive(Debug, Deserialize)]
pub(crate) struct UnpaywallResponse {
    #[serde(default)]
    pub is_oa: bool,
    pub best_oa_location: Option<OaLocation>,
    #[serde(default)]
    pub oa_locations: Vec<OaLocation>,
}

/// A single open-access location entry.
#[derive(Debug, Deserialize)]
pub(crate) struct OaLocation {
    pub url: Option<String>,
    pub url_for_pdf: Option<String>,
}

// ==================== UnpaywallResolver ====================

/// Resolves DOIs to open-access PDF URLs via the Unpaywall REST API.
///
/// The resolver queries `{base}/{doi}?email={contact}` and picks a URL in
/// this order: `best_oa_location.url_for_pdf`, `best_oa_location.url`,
/// then the first `oa_locations[]` entry offering either field.
pub struct UnpaywallResolver {
    client: Client,
    base_url: String,
    email: String,
}

impl UnpaywallResolver {
    /// Creates a resolver against the production Unpaywall endpoint.
    ///
    /// # Arguments
    ///
    /// * `email` - Contact email required by the Unpaywall API
    /// * `timeout_secs` - Lookup request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the email contains control characters or
    /// HTTP client construction fails.
    pub fn new(email: impl Into<String>, timeout_secs: u64) -> Result<Self, ResolveError> {
        Self::build(email.into(), DEFAULT_BASE_URL.to_string(), timeout_secs)
    }

    /// Creates a resolver with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the email contains control characters or
    /// HTTP client construction fails.
    pub fn with_base_url(
        email: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ResolveError> {
        Self::build(email.into(), base_url.into(), timeout_secs)
    }

    fn build(email: String, base_url: String, timeout_secs: u64) -> Result<Self, ResolveError> {
        if email.chars().any(|c| c == '\n' || c == '\r' || c == '\0') {
            return Err(ResolveError::client_construction(
                SOURCE_NAME,
                "contact email contains invalid control characters",
            ));
        }
        let client = build_lookup_http_client(
            SOURCE_NAME,
            standard_user_agent("unpaywall"),
            timeout_secs,
        )?;

        Ok(Self {
            client,
            base_url,
            email,
        })
    }
}

impl std::fmt::Debug for UnpaywallResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpaywallResolver")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for UnpaywallResolver {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn can_handle(&self, _reference: &Reference) -> bool {
        true
    }

    #[tracing::instrument(skip(self, reference), fields(resolver = "unpaywall", doi = %reference.doi))]
    async fn resolve(&self, reference: &Reference) -> ResolveOutcome {
        let doi = &reference.doi;
        let url = format!(
            "{}/{}?email={}",
            self.base_url,
            urlencoding::encode(doi),
            urlencoding::encode(&self.email)
        );

        debug!(api_url = %url, "Calling Unpaywall API");

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Unpaywall request failed");
                return ResolveOutcome::miss(ResolveError::unreachable(
                    SOURCE_NAME,
                    doi,
                    e.to_string(),
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Unpaywall returned non-success");
            return ResolveOutcome::miss(ResolveError::status(SOURCE_NAME, doi, status.as_u16()));
        }

        let body = match response.json::<UnpaywallResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Failed to parse Unpaywall response JSON");
                return ResolveOutcome::miss(ResolveError::malformed(
                    SOURCE_NAME,
                    doi,
                    e.to_string(),
                ));
            }
        };

        if !body.is_oa {
            debug!("Work is not open access according to Unpaywall");
            return ResolveOutcome::miss(ResolveError::not_open_access(SOURCE_NAME, doi));
        }

        match pick_pdf_url(&body) {
            Some(pdf_url) => {
                debug!(pdf_url = %pdf_url, "Found PDF URL in Unpaywall response");
                ResolveOutcome::found(pdf_url)
            }
            None => {
                debug!("Open-access work but no usable URL field");
                ResolveOutcome::miss(ResolveError::no_pdf_location(SOURCE_NAME, doi))
            }
        }
    }
}

// ==================== Extraction Helpers ====================

/// Picks the best PDF URL from an Unpaywall response.
///
/// Priority:
/// 1. `best_oa_location.url_for_pdf` (direct PDF)
/// 2. `best_oa_location.url` (landing page)
/// 3. First `oa_locations[]` entry with either field, same per-entry order
fn pick_pdf_url(body: &UnpaywallResponse) -> Option<String> {
    if let Some(best) = &body.best_oa_location
        && let Some(url) = location_url(best)
    {
        return Some(url);
    }

    body.oa_locations.iter().find_map(location_url)
}

fn location_url(location: &OaLocation) -> Option<String> {
    location
        .url_for_pdf
        .clone()
        .or_else(|| location.url.clone())
}
