//! Connection settings from a TOML file and the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::env::{
    validate_config_with, API_VERSION_VAR, BASE_PATH_VAR, HOST_VAR, TOKEN_VAR,
};
use super::{ConfigError, Result};
use crate::api::{Configuration, DEFAULT_API_VERSION};

/// Name of the settings file inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Connection settings.
///
/// Loaded from an optional TOML file and then overridden by environment
/// variables. The token is only ever taken from the environment; a `token`
/// key in the file is ignored.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Host name of the JIRA instance.
    pub host: Option<String>,
    /// Full REST base path; wins over `host` when set.
    pub base_path: Option<String>,
    /// REST API version segment.
    pub api_version: String,
    /// Bearer token.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: None,
            base_path: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            token: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("base_path", &self.base_path)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields default settings; a
    /// missing file at an explicit path is an error. Environment overrides
    /// are applied afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_env();
        Ok(settings)
    }

    /// Parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading settings file");
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        toml::from_str(&content).map_err(ConfigError::ParseError)
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Override fields from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get(HOST_VAR) {
            self.host = Some(host);
        }
        if let Some(base_path) = get(BASE_PATH_VAR) {
            self.base_path = Some(base_path);
        }
        if let Some(api_version) = get(API_VERSION_VAR) {
            self.api_version = api_version;
        }
        if let Some(token) = get(TOKEN_VAR) {
            self.token = Some(token);
        }
    }

    /// Names of required settings that are still missing.
    ///
    /// Uses the same rules and names as
    /// [`validate_config`](super::validate_config).
    pub fn missing(&self) -> Vec<String> {
        validate_config_with(|name| self.lookup(name))
    }

    /// Check that every required setting is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSettings` listing what is absent.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingSettings(missing))
        }
    }

    /// Build the client configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSettings` if required settings are absent.
    pub fn connection(&self) -> Result<Configuration> {
        self.validate()?;

        let host = self.host.as_deref().unwrap_or_default();
        let token = self.token.as_deref().unwrap_or_default();
        Ok(Configuration::for_host(host, token, self.base_path.as_deref())
            .with_api_version(&self.api_version))
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            HOST_VAR => self.host.clone(),
            BASE_PATH_VAR => self.base_path.clone(),
            TOKEN_VAR => self.token.clone(),
            API_VERSION_VAR => Some(self.api_version.clone()),
            _ => None,
        }
    }
}

/// Default settings file location.
///
/// - Linux: `~/.config/jira-service/config.toml`
/// - macOS: `~/Library/Application Support/jira-service/config.toml`
/// - Windows: `C:\Users\<User>\AppData\Roaming\jira-service\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jira-service").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_version, "2");
        assert_eq!(settings.missing().len(), 2);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = \"company.atlassian.net\"").unwrap();
        writeln!(file, "api_version = \"3\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.host.as_deref(), Some("company.atlassian.net"));
        assert_eq!(settings.api_version, "3");
        assert!(settings.base_path.is_none());
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_from_file_ignores_token() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = \"company.atlassian.net\"").unwrap();
        writeln!(file, "token = \"from-file\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = ").unwrap();

        let result = Settings::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut settings = Settings {
            host: Some("file.example.com".to_string()),
            ..Settings::default()
        };
        settings.apply_env_with(vars(&[
            ("JIRA_HOST", "env.example.com"),
            ("JIRA_API_TOKEN", "secret"),
            ("JIRA_API_VERSION", "3"),
            ("JIRA_BASE_PATH", ""),
        ]));

        assert_eq!(settings.host.as_deref(), Some("env.example.com"));
        assert_eq!(settings.token.as_deref(), Some("secret"));
        assert_eq!(settings.api_version, "3");
        assert!(settings.base_path.is_none());
        assert!(settings.missing().is_empty());
    }

    #[test]
    fn test_connection_from_host() {
        let mut settings = Settings::default();
        settings.apply_env_with(vars(&[
            ("JIRA_HOST", "company.atlassian.net"),
            ("JIRA_API_TOKEN", "secret"),
        ]));

        let config = settings.connection().unwrap();
        assert_eq!(config.base_path, "https://company.atlassian.net/rest");
        assert_eq!(config.access_token, "secret");
        assert_eq!(config.api_version, "2");
    }

    #[test]
    fn test_connection_prefers_base_path() {
        let mut settings = Settings::default();
        settings.apply_env_with(vars(&[
            ("JIRA_HOST", "company.atlassian.net"),
            ("JIRA_BASE_PATH", "https://gateway.example.com/jira/rest"),
            ("JIRA_API_TOKEN", "secret"),
        ]));

        let config = settings.connection().unwrap();
        assert_eq!(config.base_path, "https://gateway.example.com/jira/rest");
    }

    #[test]
    fn test_connection_reports_missing_settings() {
        let mut settings = Settings::default();
        settings.apply_env_with(vars(&[("JIRA_HOST", "company.atlassian.net")]));

        match settings.connection() {
            Err(ConfigError::MissingSettings(missing)) => {
                assert_eq!(missing, vec!["JIRA_API_TOKEN"])
            }
            other => panic!("Expected MissingSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_does_not_expose_token() {
        let settings = Settings {
            token: Some("secret_token".to_string()),
            ..Settings::default()
        };
        assert!(!format!("{:?}", settings).contains("secret_token"));
    }

    #[test]
    #[serial]
    fn test_load_explicit_path_applies_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_path = \"https://jira.example.com/rest\"").unwrap();

        std::env::set_var(TOKEN_VAR, "from-env");
        std::env::remove_var(BASE_PATH_VAR);
        let settings = Settings::load(Some(file.path())).unwrap();
        std::env::remove_var(TOKEN_VAR);

        assert_eq!(settings.base_path.as_deref(), Some("https://jira.example.com/rest"));
        assert_eq!(settings.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("jira-service/config.toml"));
        }
    }
}
