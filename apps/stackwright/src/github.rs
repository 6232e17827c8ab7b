//! # GitHub Client
//!
//! Public repositories of a user, for the portfolio's project list.
//!
//! The client is constructed explicitly and shared through the app state.
//! Answers are cached per request signature for the configured TTL, in a
//! cache bounded to [`MAX_CACHED_USERS`] entries.

use crate::config::GithubConfig;
use crate::remote::{RemoteError, check_status, http_client};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// GitHub login names: 1-39 alphanumerics or single inner hyphens.
const MAX_LOGIN_LENGTH: usize = 39;

/// Distinct users whose repositories are kept at once.
pub const MAX_CACHED_USERS: u64 = 1_000;

/// The subset of a repository the site displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
    cache: Cache<String, Vec<Repository>>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base", &self.config.api_base)
            .field("cache_ttl_secs", &self.config.cache_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, RemoteError> {
        Self::with_capacity(config, MAX_CACHED_USERS)
    }

    fn with_capacity(config: GithubConfig, max_capacity: u64) -> Result<Self, RemoteError> {
        let http = http_client(Duration::from_secs(config.timeout_secs))?;
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();
        Ok(Self {
            http,
            config,
            cache,
        })
    }

    /// Public repositories of `user`, most recently updated first.
    pub async fn user_repos(&self, user: &str) -> Result<Vec<Repository>, RemoteError> {
        validate_login(user)?;
        let signature = format!("users/{}/repos", user.to_ascii_lowercase());

        if let Some(hit) = self.cache.get(&signature).await {
            tracing::debug!(user, "GitHub repos served from cache");
            return Ok(hit);
        }

        let url = format!(
            "{}/users/{}/repos?sort=updated&per_page=100",
            self.config.api_base.trim_end_matches('/'),
            user
        );
        let mut req = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = self.config.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::ConnectionFailed(format!("{url}: {e}")))?;
        let repos: Vec<Repository> = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::ParseError(e.to_string()))?;

        tracing::info!(user, count = repos.len(), "Fetched GitHub repos");
        self.cache.insert(signature, repos.clone()).await;
        Ok(repos)
    }
}

fn validate_login(user: &str) -> Result<(), RemoteError> {
    let valid = !user.is_empty()
        && user.len() <= MAX_LOGIN_LENGTH
        && user.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !user.starts_with('-')
        && !user.ends_with('-')
        && !user.contains("--");
    if valid {
        Ok(())
    } else {
        Err(RemoteError::InvalidInput(format!(
            "'{user}' is not a valid GitHub username"
        )))
    }
}
