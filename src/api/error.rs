//! API error types for the JIRA client.

use thiserror::Error;

/// Errors that can occur when talking to the JIRA REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed - missing or invalid token.
    #[error("Authentication failed: check your API token")]
    Unauthorized,

    /// Permission denied - the token lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request was rejected, usually a JQL or field validation problem.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited by the JIRA API.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// JIRA server error.
    #[error("JIRA server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            400 => ApiError::BadRequest(context.to_string()),
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }

    /// Build an error from a failed response, preferring JIRA's own messages.
    ///
    /// JIRA reports failures as `{"errorMessages": [...], "errors": {...}}`.
    /// Falls back to the request URL when the body carries neither.
    pub fn from_response(status: reqwest::StatusCode, url: &str, body: &str) -> Self {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(arr) = json.get("errorMessages").and_then(|m| m.as_array()) {
                if !arr.is_empty() {
                    let joined = arr
                        .iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return ApiError::from_status(status, &joined);
                }
            }
            if let Some(obj) = json.get("errors").and_then(|e| e.as_object()) {
                let error_strings: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| match v.as_str() {
                        Some(s) => format!("{}: {}", k, s),
                        None => format!("{}: {}", k, v),
                    })
                    .collect();
                if !error_strings.is_empty() {
                    return ApiError::from_status(status, &error_strings.join(", "));
                }
            }
        }

        ApiError::from_status(status, url)
    }

    /// The HTTP status this error was built from, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::ServerError(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}
