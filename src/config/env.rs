//! Environment checks.

/// Bearer token for the JIRA API. Required.
pub const TOKEN_VAR: &str = "JIRA_API_TOKEN";
/// Host name of the JIRA instance, e.g. `company.atlassian.net`.
pub const HOST_VAR: &str = "JIRA_HOST";
/// Full REST base path, used instead of the host-derived one.
pub const BASE_PATH_VAR: &str = "JIRA_BASE_PATH";
/// REST API version. Optional.
pub const API_VERSION_VAR: &str = "JIRA_API_VERSION";

/// Name reported when neither the host nor the base path is set.
pub const HOST_OR_BASE_PATH: &str = "JIRA_HOST or JIRA_BASE_PATH";

/// List the required settings missing from the process environment.
///
/// Returns an empty list when everything needed is present. Never fails and
/// never logs; callers decide what to do with the result.
pub fn validate_config() -> Vec<String> {
    validate_config_with(|name| std::env::var(name).ok())
}

/// [`validate_config`] over an arbitrary variable lookup.
///
/// Empty values count as missing.
pub fn validate_config_with<F>(lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let is_set = |name: &str| lookup(name).is_some_and(|v| !v.trim().is_empty());
    let mut missing = Vec::new();

    if !is_set(TOKEN_VAR) {
        missing.push(TOKEN_VAR.to_string());
    }

    if !is_set(HOST_VAR) && !is_set(BASE_PATH_VAR) {
        missing.push(HOST_OR_BASE_PATH.to_string());
    }

    missing
}
