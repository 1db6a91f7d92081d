//! Connection configuration for the JIRA client.

use std::fmt;

use tracing::warn;

/// API version used when none is configured.
///
/// Version 2 accepts plain-string descriptions and comment bodies, which is
/// what the service layer sends.
pub const DEFAULT_API_VERSION: &str = "2";

/// Connection settings handed to a [`JiraClient`](super::JiraClient).
///
/// Built once and never mutated afterwards. The client receives its own copy,
/// so there is no process-wide configuration to race on.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Base path of the REST API, e.g. `https://company.atlassian.net/rest`.
    pub base_path: String,
    /// Bearer token sent with every request.
    pub access_token: String,
    /// The REST API version segment (`2` or `3`).
    pub api_version: String,
}

impl Configuration {
    /// Create a configuration from its parts.
    ///
    /// `base_path` is stored exactly as given.
    pub fn new(base_path: &str, access_token: &str, api_version: &str) -> Self {
        warn_if_insecure(base_path);
        Self {
            base_path: base_path.to_string(),
            access_token: access_token.to_string(),
            api_version: api_version.to_string(),
        }
    }

    /// Build a configuration from a host name and an optional base URL override.
    ///
    /// When `full_base_url` is given it is used as-is; otherwise the base path
    /// becomes `https://{host}/rest`.
    pub fn for_host(host: &str, access_token: &str, full_base_url: Option<&str>) -> Self {
        let base_path = match full_base_url {
            Some(url) => url.to_string(),
            None => format!("https://{}/rest", host),
        };
        Self::new(&base_path, access_token, DEFAULT_API_VERSION)
    }

    /// Replace the API version.
    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// Build the full URL for a path below `/api/{version}`.
    ///
    /// Trailing slashes on the base path are dropped when joining.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}/{}",
            self.base_path.trim_end_matches('/'),
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    /// The `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("base_path", &self.base_path)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Warn about plain-HTTP endpoints outside local development.
fn warn_if_insecure(url: &str) {
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("Base path does not use HTTPS: {}. This is insecure for production use.", url);
    }
}
