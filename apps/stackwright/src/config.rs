//! # Configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. A TOML file (`--config <path>`, or `stackwright.toml` in the working
//!    directory when present)
//! 3. `STACKWRIGHT_*` environment variables
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! rate_limit = 50
//!
//! [storage]
//! path = "stacks.redb"
//! history_depth = 100
//!
//! [remote]
//! base_url = "http://localhost:11434/v1"
//! model = "llama3"
//! ```

use serde::{Deserialize, Serialize};
use stackwright_core::StackError;
use stackwright_core::primitives::DEFAULT_HISTORY_DEPTH;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stackwright.toml";

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub catalog: CatalogConfig,
    pub github: GithubConfig,
}

/// HTTP server and its security middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer key required on every endpoint but `/health`. `None` disables
    /// authentication.
    pub api_key: Option<String>,
    /// Comma-separated origins, or `*`. `None` allows localhost only.
    pub cors_origins: Option<String>,
    /// Requests per second, 0 disables limiting.
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_key: None,
            cors_origins: None,
            rate_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub history_depth: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stackwright.redb"),
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// OpenAI-compatible chat completion endpoint used for remote analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Remote technology catalog. `None` uses the built-in list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            cache_ttl_secs: 300,
            timeout_secs: 10,
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Load defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, StackError> {
        let mut config = match path {
            Some(path) => Self::read_toml_file(path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::read_toml_file(local)?
                } else {
                    tracing::debug!("No config file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, StackError> {
        toml::from_str(text).map_err(|e| StackError::InvalidConfig(e.to_string()))
    }

    fn read_toml_file(path: &Path) -> Result<Self, StackError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StackError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply `STACKWRIGHT_*` overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = var("STACKWRIGHT_API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(origins) = var("STACKWRIGHT_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        if let Some(limit) = var("STACKWRIGHT_RATE_LIMIT") {
            match limit.parse() {
                Ok(limit) => self.server.rate_limit = limit,
                Err(_) => tracing::warn!(value = %limit, "Ignoring invalid STACKWRIGHT_RATE_LIMIT"),
            }
        }
        if let Some(url) = var("STACKWRIGHT_REMOTE_URL") {
            self.remote.base_url = url;
        }
        if let Some(model) = var("STACKWRIGHT_REMOTE_MODEL") {
            self.remote.model = model;
        }
        if let Some(key) = var("STACKWRIGHT_REMOTE_API_KEY") {
            self.remote.api_key = Some(key);
        }
        if let Some(url) = var("STACKWRIGHT_CATALOG_URL") {
            self.catalog.url = Some(url);
        }
        if let Some(token) = var("STACKWRIGHT_GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
    }

    /// Reject settings the app cannot run with.
    pub fn validate(&self) -> Result<(), StackError> {
        if self.storage.history_depth == 0 {
            return Err(StackError::InvalidConfig(
                "storage.history_depth must be at least 1".to_string(),
            ));
        }
        if self.remote.timeout_secs == 0 {
            return Err(StackError::InvalidConfig(
                "remote.timeout_secs must be at least 1".to_string(),
            ));
        }
        for (name, url) in [
            ("remote.base_url", &self.remote.base_url),
            ("github.api_base", &self.github.api_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(StackError::InvalidConfig(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.history_depth, 50);
        assert_eq!(config.github.cache_ttl_secs, 300);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [remote]
            model = "llama3"
            "#,
        )
        .expect("parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.remote.model, "llama3");
        assert_eq!(config.remote.base_url, RemoteConfig::default().base_url);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(matches!(
            Config::from_toml("[server\nport = 1"),
            Err(StackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("STACKWRIGHT_API_KEY", "secret"),
            ("STACKWRIGHT_RATE_LIMIT", "5"),
            ("STACKWRIGHT_REMOTE_API_KEY", "sk-test"),
            ("STACKWRIGHT_CORS_ORIGINS", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.server.api_key.as_deref(), Some("secret"));
        assert_eq!(config.server.rate_limit, 5);
        assert_eq!(config.remote.api_key.as_deref(), Some("sk-test"));
        assert!(config.server.cors_origins.is_none());
    }

    #[test]
    fn invalid_rate_limit_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|name| {
            (name == "STACKWRIGHT_RATE_LIMIT").then(|| "lots".to_string())
        });
        assert_eq!(config.server.rate_limit, 100);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = Config::default();
        config.storage.history_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.remote.base_url = "ftp://models".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let missing = temp.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(StackError::IoError(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("stackwright.toml");
        std::fs::write(&path, "[storage]\nhistory_depth = 7\n").expect("write");
        let config = Config::load(Some(&path)).expect("load");
        assert_eq!(config.storage.history_depth, 7);
    }
}
