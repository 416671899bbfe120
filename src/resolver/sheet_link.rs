//! Spreadsheet-link resolver - last-resort source from the input file.
//!
//! When both lookup services come up empty, the chain falls back to the
//! PDF link supplied in the spreadsheet row, tagged distinctly so the
//! report shows where the URL came from.

use async_trait::async_trait;

use crate::parser::Reference;

use super::{ResolveOutcome, Resolver};

/// Source tag reported for spreadsheet-supplied links.
const SOURCE_NAME: &str = "Excel Link";

/// Resolver over the spreadsheet-provided fallback URL.
///
/// Applicable only to references that carry a fallback link; the URL is
/// used verbatim (the extractor already restricted it to http/https).
#[derive(Debug, Default)]
pub struct SheetLinkResolver;

impl SheetLinkResolver {
    /// Creates a new spreadsheet-link resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for SheetLinkResolver {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn can_handle(&self, reference: &Reference) -> bool {
        reference.fallback_url.is_some()
    }

    async fn resolve(&self, reference: &Reference) -> ResolveOutcome {
        match &reference.fallback_url {
            Some(url) => ResolveOutcome::found(url.clone()),
            None => ResolveOutcome::not_found(),
        }
    }
}
