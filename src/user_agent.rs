//! Shared User-Agent strings for lookup HTTP clients.
//!
//! Single source for project URL and UA format so lookup traffic stays
//! consistent and easy to update (good citizenship; RFC 9308). Download
//! traffic deliberately uses a browser UA instead, see
//! [`crate::download::BROWSER_USER_AGENT`].

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/oaharvest";

/// Default User-Agent for lookup-service requests (identifies the tool).
#[must_use]
pub(crate) fn default_lookup_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("oaharvest/{version} (open-access-research-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ua_contains_project_url_and_version() {
        let ua = default_lookup_user_agent();
        assert!(
            ua.contains(PROJECT_UA_URL),
            "lookup UA must contain project URL: {ua}"
        );
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("oaharvest/")
                .and_then(|s| s.split(' ').next())
                .unwrap_or_default(),
            "lookup UA must contain crate version"
        );
    }

    #[test]
    fn test_lookup_ua_identifies_tool() {
        let ua = default_lookup_user_agent();
        assert!(
            ua.contains("open-access-research-tool"),
            "lookup UA must identify the tool: {ua}"
        );
        assert!(!ua.contains("Mozilla"), "lookup UA must not mimic a browser");
    }
}
