//! Configuration types for Taxonomist

use crate::system::paths;
use crate::TaxonomistError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the publishing API bearer token
pub const BEARER_TOKEN_ENV: &str = "PUBLISHING_API_BEARER_TOKEN";
/// Environment variable overriding the publishing API base URL
pub const PUBLISHING_API_URL_ENV: &str = "PUBLISHING_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub publishing_api: PublishingApiConfig,
    #[serde(default)]
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub versions: VersionsConfig,
    #[serde(default)]
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishingApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_bearer_token")]
    pub bearer_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Maximum number of child lookups in flight per tree level
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VersionsConfig {
    /// SQLite file holding the version log (defaults to $TAXONOMIST_HOME/versions.db)
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishingConfig {
    #[serde(default = "default_publishing_app")]
    pub publishing_app: String,
    #[serde(default = "default_rendering_app")]
    pub rendering_app: String,
    /// Content item whose `root_taxons` links list the top-level taxons
    #[serde(default = "default_homepage_content_id")]
    pub homepage_content_id: String,
}

// Default value functions
fn default_api_url() -> String { "http://publishing-api.dev.gov.uk".to_string() }
fn default_bearer_token() -> String { "example".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_connect_timeout_secs() -> u64 { 10 }
fn default_concurrency() -> usize { 8 }
fn default_publishing_app() -> String { "content-tagger".to_string() }
fn default_rendering_app() -> String { "collections".to_string() }
fn default_homepage_content_id() -> String { "f3bbdec2-0e62-4520-a7fd-6ffd5d36e03a".to_string() }

impl Default for PublishingApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            bearer_token: default_bearer_token(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl PublishingApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            publishing_app: default_publishing_app(),
            rendering_app: default_rendering_app(),
            homepage_content_id: default_homepage_content_id(),
        }
    }
}

impl Config {
    /// Apply environment overrides on top of file values
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(BEARER_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.publishing_api.bearer_token = token;
            }
        }
        if let Ok(url) = std::env::var(PUBLISHING_API_URL_ENV) {
            if !url.trim().is_empty() {
                self.publishing_api.url = url;
            }
        }
    }

    /// Resolved location of the version log database
    pub fn versions_database_path(&self) -> PathBuf {
        self.versions
            .database_path
            .clone()
            .unwrap_or_else(paths::taxonomist_versions_db)
    }

    /// Reject values that would make the client or expander unusable
    pub fn validate(&self) -> Result<(), TaxonomistError> {
        if self.publishing_api.url.trim().is_empty() {
            return Err(TaxonomistError::Configuration(
                "publishing_api.url must not be empty".to_string(),
            ));
        }
        if self.expansion.concurrency == 0 {
            return Err(TaxonomistError::Configuration(
                "expansion.concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, TaxonomistError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), TaxonomistError> {
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Load the explicit config file, else `$TAXONOMIST_HOME/config.toml` when it
/// exists, else defaults. Environment overrides are applied last.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, TaxonomistError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => {
            let default_path = paths::taxonomist_config_path();
            if default_path.exists() {
                tracing::debug!("Loading config from {}", default_path.display());
                load_config(&default_path)?
            } else {
                default_config()
            }
        }
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.publishing_api.url, "http://publishing-api.dev.gov.uk");
        assert_eq!(config.publishing_api.bearer_token, "example");
        assert_eq!(config.publishing_api.timeout(), Duration::from_secs(30));
        assert_eq!(config.publishing_api.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.expansion.concurrency, 8);
        assert!(config.versions.database_path.is_none());
        assert_eq!(config.publishing.publishing_app, "content-tagger");
        assert_eq!(config.publishing.rendering_app, "collections");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [publishing_api]
            url = "https://publishing-api.example.com"

            [expansion]
            concurrency = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.publishing_api.url, "https://publishing-api.example.com");
        assert_eq!(config.publishing_api.timeout_secs, 30);
        assert_eq!(config.expansion.concurrency, 2);
        assert_eq!(config.publishing.publishing_app, "content-tagger");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.versions.database_path = Some(PathBuf::from("/tmp/versions.db"));
        config.expansion.concurrency = 3;
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.versions.database_path, Some(PathBuf::from("/tmp/versions.db")));
        assert_eq!(loaded.expansion.concurrency, 3);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[publishing_api").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, TaxonomistError::Configuration(_)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.expansion.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_token_and_url() {
        std::env::set_var(BEARER_TOKEN_ENV, "secret-token");
        std::env::set_var(PUBLISHING_API_URL_ENV, "http://localhost:3093");

        let mut config = Config::default();
        config.apply_env();

        std::env::remove_var(BEARER_TOKEN_ENV);
        std::env::remove_var(PUBLISHING_API_URL_ENV);

        assert_eq!(config.publishing_api.bearer_token, "secret-token");
        assert_eq!(config.publishing_api.url, "http://localhost:3093");
    }

    #[test]
    #[serial]
    fn test_load_or_default_with_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[expansion]\nconcurrency = 4").unwrap();

        let config = load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.expansion.concurrency, 4);
    }
}
