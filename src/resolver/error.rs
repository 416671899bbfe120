//! Diagnostic error type for resolver operations.
//!
//! Resolvers have a total contract: [`super::Resolver::resolve`] never
//! propagates a fault. This type exists as the diagnostic payload attached
//! to an absent result, and as the error of resolver constructors.

use thiserror::Error;

/// Faults a resolver can encounter while looking up a DOI.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The lookup service could not be reached at all.
    #[error("{service} unreachable for '{doi}': {reason}")]
    ServiceUnreachable {
        /// Name of the lookup service.
        service: String,
        /// The DOI being looked up.
        doi: String,
        /// The transport-level failure.
        reason: String,
    },

    /// The lookup service answered with a non-success status.
    #[error("{service} returned HTTP {status} for '{doi}'")]
    ServiceStatus {
        /// Name of the lookup service.
        service: String,
        /// The DOI being looked up.
        doi: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body did not match the expected payload shape.
    #[error("{service} response for '{doi}' could not be parsed: {reason}")]
    MalformedResponse {
        /// Name of the lookup service.
        service: String,
        /// The DOI being looked up.
        doi: String,
        /// The parse failure.
        reason: String,
    },

    /// The service knows the work but does not flag it as open access.
    #[error("'{doi}' is not open access according to {service}")]
    NotOpenAccess {
        /// Name of the lookup service.
        service: String,
        /// The DOI being looked up.
        doi: String,
    },

    /// The service answered but offered no usable PDF location.
    #[error("{service} has no PDF location for '{doi}'")]
    NoPdfLocation {
        /// Name of the lookup service.
        service: String,
        /// The DOI being looked up.
        doi: String,
    },

    /// HTTP client construction failed while building the resolver.
    #[error("cannot build HTTP client for {service}: {reason}")]
    ClientConstruction {
        /// Name of the lookup service.
        service: String,
        /// Why construction failed.
        reason: String,
    },
}

impl ResolveError {
    /// Creates a `ServiceUnreachable` diagnostic.
    #[must_use]
    pub fn unreachable(service: &str, doi: &str, reason: impl Into<String>) -> Self {
        Self::ServiceUnreachable {
            service: service.to_string(),
            doi: doi.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `ServiceStatus` diagnostic.
    #[must_use]
    pub fn status(service: &str, doi: &str, status: u16) -> Self {
        Self::ServiceStatus {
            service: service.to_string(),
            doi: doi.to_string(),
            status,
        }
    }

    /// Creates a `MalformedResponse` diagnostic.
    #[must_use]
    pub fn malformed(service: &str, doi: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service: service.to_string(),
            doi: doi.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `NotOpenAccess` diagnostic.
    #[must_use]
    pub fn not_open_access(service: &str, doi: &str) -> Self {
        Self::NotOpenAccess {
            service: service.to_string(),
            doi: doi.to_string(),
        }
    }

    /// Creates a `NoPdfLocation` diagnostic.
    #[must_use]
    pub fn no_pdf_location(service: &str, doi: &str) -> Self {
        Self::NoPdfLocation {
            service: service.to_string(),
            doi: doi.to_string(),
        }
    }

    /// Creates a `ClientConstruction` error.
    #[must_use]
    pub fn client_construction(service: &str, reason: impl Into<String>) -> Self {
        Self::ClientConstruction {
            service: service.to_string(),
            reason: reason.into(),
        }
    }
}
