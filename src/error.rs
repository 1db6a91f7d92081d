//! Centralized error types.
//!
//! [`AppError`] aggregates the configuration, client, operation and tool
//! errors and turns them into messages fit for a terminal. Service operations
//! report a single [`OperationError`]; the finer distinctions here come from
//! downcasting its cause.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::operation::OperationError;
use crate::tools::ToolError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Errors building the API client.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A service operation failed.
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// A tool call was rejected or failed.
    #[error("{0}")]
    Tool(#[from] ToolError),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// The client error behind this error, if there is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::Operation(e) | AppError::Tool(ToolError::Operation(e)) => e.downcast_ref(),
            _ => None,
        }
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        if let AppError::Config(ConfigError::MissingSettings(missing)) = self {
            return format!("Missing configuration: {}.", missing.join(", "));
        }

        let detail = match self.api_error() {
            Some(ApiError::Unauthorized) => {
                Some("Authentication failed. Please check your API token.".to_string())
            }
            Some(ApiError::Forbidden) => Some(
                "Access denied. You don't have permission to access this resource.".to_string(),
            ),
            Some(ApiError::NotFound(resource)) => Some(format!("'{}' was not found.", resource)),
            Some(ApiError::BadRequest(msg)) => Some(format!("JIRA rejected the request: {}", msg)),
            Some(ApiError::RateLimited) => {
                Some("Too many requests. Please wait a moment and try again.".to_string())
            }
            Some(ApiError::ServerError(_)) => {
                Some("JIRA server error. Please try again later.".to_string())
            }
            Some(ApiError::Network(_)) => {
                Some("Connection failed. Please check your network and JIRA URL.".to_string())
            }
            Some(ApiError::InvalidResponse(_)) => {
                Some("Unexpected response from JIRA.".to_string())
            }
            None => None,
        };

        match (self, detail) {
            (AppError::Operation(e), Some(detail))
            | (AppError::Tool(ToolError::Operation(e)), Some(detail)) => {
                format!("{}: {}", e.context(), detail)
            }
            (_, Some(detail)) => detail,
            (_, None) => self.to_string(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        if matches!(self, AppError::Config(ConfigError::MissingSettings(_))) {
            return Some("Set JIRA_API_TOKEN and either JIRA_HOST or JIRA_BASE_PATH.");
        }

        match self.api_error() {
            Some(ApiError::Unauthorized) => {
                Some("Check that JIRA_API_TOKEN holds a valid personal access token.")
            }
            Some(ApiError::RateLimited) => Some("Wait a few seconds and run the command again."),
            Some(ApiError::Network(_)) => {
                Some("Check your internet connection and JIRA_HOST / JIRA_BASE_PATH.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn operation_error(cause: ApiError) -> AppError {
        AppError::Operation(OperationError::new("Error fetching issue", cause))
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::MissingSettings(vec!["JIRA_API_TOKEN".into()]).into();
        assert!(matches!(app_err, AppError::Config(ConfigError::MissingSettings(_))));
    }

    #[test]
    fn test_display_keeps_operation_message() {
        let err = operation_error(ApiError::NotFound("PROJ-123".to_string()));
        assert_eq!(
            err.to_string(),
            "Error fetching issue: Resource not found: PROJ-123"
        );
    }

    #[test]
    fn test_api_error_downcasts_operation_cause() {
        let err = operation_error(ApiError::Unauthorized);
        assert!(matches!(err.api_error(), Some(ApiError::Unauthorized)));

        let err = AppError::Operation(OperationError::new(
            "Error",
            std::io::Error::new(std::io::ErrorKind::Other, "disk"),
        ));
        assert!(err.api_error().is_none());
    }

    #[test]
    fn test_user_message_unauthorized() {
        let msg = operation_error(ApiError::Unauthorized).user_message();
        assert_eq!(
            msg,
            "Error fetching issue: Authentication failed. Please check your API token."
        );
    }

    #[test]
    fn test_user_message_not_found() {
        let msg = operation_error(ApiError::NotFound("PROJ-123".to_string())).user_message();
        assert!(msg.contains("PROJ-123"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_user_message_missing_settings() {
        let err = AppError::Config(ConfigError::MissingSettings(vec![
            "JIRA_API_TOKEN".to_string(),
        ]));
        assert_eq!(err.user_message(), "Missing configuration: JIRA_API_TOKEN.");
    }

    #[test]
    fn test_user_message_tool_error() {
        let err = AppError::Tool(ToolError::UnknownTool("nope".to_string()));
        assert_eq!(err.user_message(), "Unknown tool: nope");
    }

    #[test]
    fn test_suggested_action_unauthorized() {
        let action = operation_error(ApiError::Unauthorized).suggested_action();
        assert!(action.unwrap().contains("JIRA_API_TOKEN"));
    }

    #[test]
    fn test_suggested_action_rate_limited() {
        let action = operation_error(ApiError::RateLimited).suggested_action();
        assert!(action.unwrap().contains("again"));
    }

    #[test]
    fn test_no_suggested_action_for_not_found() {
        let err = operation_error(ApiError::NotFound("x".to_string()));
        assert!(err.suggested_action().is_none());
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert_eq!(err.user_message(), "something went wrong");
    }
}
