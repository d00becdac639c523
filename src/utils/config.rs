//! TOML-based configuration for the Crop Advisor terminal client
//!
//! Settings live in `crop-advisor.toml`. Every field has a default, so an
//! empty file (or none at all) yields a working configuration pointing at a
//! local backend. Environment variables are applied on top of the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crop_advisor_core::chat::{ChatContext, DEFAULT_CROP_TYPE, DEFAULT_LOCATION};
use crop_advisor_core::session::StorePolicy;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "crop-advisor.toml";

/// Environment variable overriding `[api] base_url`.
pub const ENV_API_URL: &str = "CROP_ADVISOR_API_URL";
/// Environment variable overriding `[session] token_path`.
pub const ENV_TOKEN_PATH: &str = "CROP_ADVISOR_TOKEN_PATH";
/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "CROP_ADVISOR_LOG";

/// Root configuration structure loaded from crop-advisor.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Backend base URL, including the `/api/v1` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for `POST /chat`
    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,

    /// Deadline for auth and status calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_chat_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_timeout_secs: default_chat_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Where the bearer token is kept. Defaults to the user config directory.
    #[serde(default)]
    pub token_path: Option<PathBuf>,

    /// Keep the token after the client exits
    #[serde(default = "default_true")]
    pub persist_across_reload: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            persist_across_reload: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_crop_type")]
    pub crop_type: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_crop_type() -> String {
    DEFAULT_CROP_TYPE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            crop_type: default_crop_type(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No token path configured and no user config directory found")]
    NoTokenPath,
}

impl AdvisorConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AdvisorConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load `path` when given, otherwise the default file if it exists,
    /// otherwise built-in defaults. An explicit path that does not exist is
    /// an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(path) = lookup(ENV_TOKEN_PATH).filter(|v| !v.trim().is_empty()) {
            self.session.token_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must start with http:// or https:// (got '{}')",
                self.api.base_url
            )));
        }
        if self.api.chat_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.chat_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim().trim_end_matches('/')
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.api.chat_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Resolved token file: the configured path or
    /// `<config dir>/crop-advisor/token`.
    pub fn token_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.session.token_path {
            return Ok(path.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("crop-advisor").join("token"))
            .ok_or(ConfigError::NoTokenPath)
    }

    pub fn store_policy(&self) -> StorePolicy {
        StorePolicy {
            persist_across_reload: self.session.persist_across_reload,
        }
    }

    pub fn chat_context(&self) -> ChatContext {
        ChatContext::new(&self.chat.location, &self.chat.crop_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn create_test_config() -> String {
        r#"
[api]
base_url = "https://advisor.example.org/api/v1/"
chat_timeout_secs = 45

[session]
token_path = "/tmp/crop-advisor-test/token"
persist_across_reload = false

[chat]
location = "Oromia"
crop_type = "teff"

[logging]
level = "debug"
format = "json"
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = AdvisorConfig::parse(&create_test_config()).expect("Failed to parse config");

        assert_eq!(config.base_url(), "https://advisor.example.org/api/v1");
        assert_eq!(config.chat_timeout(), Duration::from_secs(45));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(
            config.token_path().unwrap(),
            PathBuf::from("/tmp/crop-advisor-test/token")
        );
        assert_eq!(config.store_policy(), StorePolicy::EPHEMERAL);
        assert_eq!(config.chat_context(), ChatContext::new("Oromia", "teff"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AdvisorConfig::parse("").unwrap();

        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(config.chat_timeout(), Duration::from_secs(30));
        assert_eq!(config.store_policy(), StorePolicy::PERSISTENT);
        assert_eq!(config.chat_context(), ChatContext::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://10.0.0.5:8000/api/v1"),
            (ENV_TOKEN_PATH, "/var/lib/advisor/token"),
            (ENV_LOG, "crop_advisor=trace"),
        ]
        .into_iter()
        .collect();

        let mut config = AdvisorConfig::default();
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url(), "http://10.0.0.5:8000/api/v1");
        assert_eq!(
            config.token_path().unwrap(),
            PathBuf::from("/var/lib/advisor/token")
        );
        assert_eq!(config.logging.level, "crop_advisor=trace");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = AdvisorConfig::default();
        config.apply_env_from(|_| Some("  ".to_string()));
        assert_eq!(config, AdvisorConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut config = AdvisorConfig::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = AdvisorConfig::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let result = AdvisorConfig::parse("[api\nbase_url = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(create_test_config().as_bytes()).unwrap();

        let config = AdvisorConfig::load(file.path()).unwrap();
        assert_eq!(config.chat.crop_type, "teff");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AdvisorConfig::load_or_default(Some(&missing)),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
