//! Configuration management.
//!
//! This module checks the environment for required settings and loads
//! connection settings from an optional TOML file.

mod env;
mod settings;

pub use env::{
    validate_config, validate_config_with, API_VERSION_VAR, BASE_PATH_VAR, HOST_OR_BASE_PATH,
    HOST_VAR, TOKEN_VAR,
};
pub use settings::{default_config_path, Settings};

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required settings are absent.
    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    /// The settings file could not be read.
    #[error("Failed to read settings file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The settings file is not valid TOML or has the wrong shape.
    #[error("Failed to parse settings file: {0}")]
    ParseError(#[source] toml::de::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_display() {
        let err = ConfigError::MissingSettings(vec![
            TOKEN_VAR.to_string(),
            HOST_OR_BASE_PATH.to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required settings: JIRA_API_TOKEN, JIRA_HOST or JIRA_BASE_PATH"
        );
    }
}
