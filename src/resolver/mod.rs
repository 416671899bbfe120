//! DOI resolution pipeline for finding open-access PDF URLs.
//!
//! This module provides an extensible resolver system that turns a
//! [`Reference`] into a downloadable PDF URL by trying lookup sources in a
//! fixed priority order with short-circuit on the first hit.
//!
//! # Architecture
//!
//! - [`Resolver`] - Async trait that individual resolvers implement
//! - [`ResolverChain`] - Ordered collection of resolvers with the lookup loop
//! - [`ResolveOutcome`] - Total (never-throwing) result of one resolve call
//! - [`UnpaywallResolver`] - Open-access aggregator lookup by DOI
//! - [`PubMedResolver`] - NCBI PMC citation-exporter full-text lookup
//! - [`SheetLinkResolver`] - Last-resort spreadsheet-supplied link
//!
//! The chain ordering itself is the resolver policy: the loop has no
//! per-service special cases.
//!
//! # Example
//!
//! ```no_run
//! use oaharvest::parser::Reference;
//! use oaharvest::resolver::build_default_resolver_chain;
//!
//! # async fn example() {
//! let chain = build_default_resolver_chain("contact@example.com", 10);
//! let reference = Reference::new("10.1038/s41586-020-2649-2", None);
//! if let Some(resolved) = chain.resolve(&reference).await {
//!     println!("{} via {}", resolved.url, resolved.source);
//! }
//! # }
//! ```

mod chain;
mod error;
mod http_client;
mod pubmed;
mod sheet_link;
mod unpaywall;

pub use chain::ResolverChain;
pub use error::ResolveError;
pub use http_client::{DEFAULT_LOOKUP_TIMEOUT_SECS, build_lookup_http_client, standard_user_agent};
pub use pubmed::PubMedResolver;
pub use sheet_link::SheetLinkResolver;
pub use unpaywall::UnpaywallResolver;

use async_trait::async_trait;
use tracing::warn;

use crate::parser::Reference;

/// A PDF URL produced by the chain, tagged with the source that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPdf {
    /// The downloadable PDF URL.
    pub url: String,
    /// Report tag of the source that produced the URL.
    pub source: String,
}

impl ResolvedPdf {
    /// Creates a new resolved PDF location.
    #[must_use]
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Result of a single resolver's attempt.
///
/// This is a total contract: lookup faults (network errors, non-200
/// responses, malformed payloads) are demoted to `NotFound` with the fault
/// attached as diagnostic metadata. `resolve` never aborts the run.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    /// A usable PDF URL was found.
    Found {
        /// The downloadable PDF URL.
        url: String,
    },
    /// This resolver produced nothing for the reference.
    NotFound {
        /// Why nothing was produced, when a concrete fault is known.
        diagnostic: Option<ResolveError>,
    },
}

impl ResolveOutcome {
    /// Creates a `Found` outcome.
    #[must_use]
    pub fn found(url: impl Into<String>) -> Self {
        Self::Found { url: url.into() }
    }

    /// Creates a `NotFound` outcome with no diagnostic.
    #[must_use]
    pub fn not_found() -> Self {
        Self::NotFound { diagnostic: None }
    }

    /// Creates a `NotFound` outcome carrying a diagnostic fault.
    #[must_use]
    pub fn miss(diagnostic: ResolveError) -> Self {
        Self::NotFound {
            diagnostic: Some(diagnostic),
        }
    }
}

/// Trait that all resolvers must implement.
///
/// Resolvers turn a reference into a downloadable PDF URL, or an absent
/// result. Ordering across resolvers is owned by [`ResolverChain`].
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Box<dyn Resolver>`; native async traits are not object-safe.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the source tag used in the report (e.g., "Unpaywall").
    fn name(&self) -> &str;

    /// Returns true if this resolver applies to the given reference.
    fn can_handle(&self, reference: &Reference) -> bool;

    /// Attempts to resolve the reference into a downloadable PDF URL.
    ///
    /// Total contract: faults become [`ResolveOutcome::NotFound`] with a
    /// diagnostic; this method never returns an error.
    async fn resolve(&self, reference: &Reference) -> ResolveOutcome;
}

/// Builds the default resolver chain used by CLI execution flows.
///
/// Order is fixed and is itself the policy: Unpaywall first, then the PMC
/// citation exporter, then the spreadsheet-supplied link as a last resort.
#[must_use]
pub fn build_default_resolver_chain(contact_email: &str, lookup_timeout_secs: u64) -> ResolverChain {
    let mut chain = ResolverChain::new();

    match UnpaywallResolver::new(contact_email, lookup_timeout_secs) {
        Ok(resolver) => chain.register(Box::new(resolver)),
        Err(error) => warn!(
            error = %error,
            "Unpaywall resolver unavailable; continuing with remaining resolvers"
        ),
    }

    match PubMedResolver::new(lookup_timeout_secs) {
        Ok(resolver) => chain.register(Box::new(resolver)),
        Err(error) => warn!(
            error = %error,
            "PubMed resolver unavailable; continuing with remaining resolvers"
        ),
    }

    chain.register(Box::new(SheetLinkResolver::new()));
    chain
}
