//! Ordered resolver chain with short-circuit resolution loop.

use tracing::{debug, info};

use crate::parser::Reference;

use super::{ResolveOutcome, ResolvedPdf, Resolver};

/// An ordered collection of resolvers.
///
/// The chain tries resolvers in registration order and stops at the first
/// one that produces a URL. The ordering is the resolution policy; the loop
/// itself knows nothing about individual services.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Appends a resolver to the chain.
    pub fn register(&mut self, resolver: Box<dyn Resolver>) {
        debug!(name = resolver.name(), "Registering resolver");
        self.resolvers.push(resolver);
    }

    /// Returns the number of registered resolvers.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns the registered resolver names in chain order.
    #[must_use]
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Resolves a reference to a PDF URL by trying resolvers in order.
    ///
    /// Returns the first hit tagged with its source name, or `None` when
    /// every applicable resolver came up empty. Lookup faults never escape:
    /// they are logged from the diagnostics the resolvers attach.
    #[tracing::instrument(skip(self), fields(doi = %reference.doi))]
    pub async fn resolve(&self, reference: &Reference) -> Option<ResolvedPdf> {
        for resolver in &self.resolvers {
            if !resolver.can_handle(reference) {
                debug!(resolver = resolver.name(), "Resolver not applicable");
                continue;
            }

            debug!(resolver = resolver.name(), "Trying resolver");
            match resolver.resolve(reference).await {
                ResolveOutcome::Found { url } => {
                    info!(
                        resolver = resolver.name(),
                        url = %url,
                        "Found PDF URL"
                    );
                    return Some(ResolvedPdf::new(url, resolver.name()));
                }
                ResolveOutcome::NotFound { diagnostic } => {
                    if let Some(diagnostic) = diagnostic {
                        debug!(
                            resolver = resolver.name(),
                            diagnostic = %diagnostic,
                            "Resolver produced nothing"
                        );
                    } else {
                        debug!(resolver = resolver.name(), "Resolver produced nothing");
                    }
                }
            }
        }

        debug!("No resolver produced a PDF URL");
        None
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field("resolver_count", &self.resolvers.len())
            .field("resolvers", &self.resolver_names())
            .finish()
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}
