//! Shared HTTP client construction policy for lookup resolvers.
//!
//! Centralizes lookup networking defaults so the service resolvers stay
//! consistent on timeout, user-agent, and compression.

use std::time::Duration;

use reqwest::Client;

use crate::user_agent;

use super::ResolveError;

/// Default lookup timeout in seconds (short: lookups are small JSON bodies).
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Builds the shared lookup user-agent string.
///
/// All lookup resolvers share one UA so traffic is not trivially
/// fingerprintable per service. `service_name` is only used for
/// logging/tracing, not in the UA string.
#[must_use]
pub fn standard_user_agent(_service_name: &str) -> String {
    user_agent::default_lookup_user_agent()
}

/// Builds a lookup HTTP client using shared project policy.
///
/// `service_name` is used only for error messages and logging, not in the
/// User-Agent header.
///
/// # Errors
///
/// Returns [`ResolveError::ClientConstruction`] when client construction fails.
pub fn build_lookup_http_client(
    service_name: &str,
    user_agent: impl Into<String>,
    timeout_secs: u64,
) -> Result<Client, ResolveError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeout_secs))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent.into())
        .gzip(true)
        .build()
        .map_err(|e| ResolveError::client_construction(service_name, e.to_string()))
}
