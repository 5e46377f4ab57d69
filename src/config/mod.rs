//! Configuration types for the GitHub connection.

use crate::errors::{GitHubError, GitHubErrorKind};
use std::time::Duration;
use url::Url;

/// Default GitHub API base address.
pub const DEFAULT_BASE_ADDRESS: &str = "https://api.github.com/";

/// Default media type sent in the `Accept` header.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the public GitHub API address.
pub fn default_base_address() -> Url {
    Url::parse(DEFAULT_BASE_ADDRESS).expect("DEFAULT_BASE_ADDRESS is a valid absolute URL")
}

/// Appends a trailing slash to the path so relative API paths join underneath it.
fn normalize_base_address(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,
    /// Idle connection timeout.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 20,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Settings for one [`HttpConnection`](crate::connection::HttpConnection).
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base address.
    pub base_address: Url,
    /// User-Agent header.
    pub user_agent: String,
    /// Accept header.
    pub accept: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Connection pool configuration.
    pub pool: PoolConfig,
}

impl GitHubConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GitHubConfigBuilder {
        GitHubConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), GitHubError> {
        if !matches!(self.base_address.scheme(), "http" | "https") {
            return Err(GitHubError::new(
                GitHubErrorKind::InvalidBaseUrl,
                "Base address must use http:// or https://",
            ));
        }

        if self.base_address.cannot_be_a_base() {
            return Err(GitHubError::new(
                GitHubErrorKind::InvalidBaseUrl,
                format!("{} cannot be used as a base address", self.base_address),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(GitHubError::argument(
                "user_agent",
                "a User-Agent is required by the GitHub API",
            ));
        }

        if self.accept.is_empty() {
            return Err(GitHubError::configuration("Accept media type cannot be empty"));
        }

        Ok(())
    }
}

/// Builder for GitHubConfig.
#[derive(Debug, Default)]
pub struct GitHubConfigBuilder {
    base_address: Option<Url>,
    user_agent: Option<String>,
    accept: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool: Option<PoolConfig>,
}

impl GitHubConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base address, e.g. a GitHub Enterprise `/api/v3` endpoint.
    pub fn base_address(mut self, url: Url) -> Self {
        self.base_address = Some(url);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the Accept header.
    pub fn accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept = Some(media_type.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the connection pool configuration.
    pub fn pool(mut self, config: PoolConfig) -> Self {
        self.pool = Some(config);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<GitHubConfig, GitHubError> {
        let config = GitHubConfig {
            base_address: normalize_base_address(
                self.base_address.unwrap_or_else(default_base_address),
            ),
            user_agent: self.user_agent.unwrap_or_default(),
            accept: self.accept.unwrap_or_else(|| DEFAULT_ACCEPT.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            pool: self.pool.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GitHubConfig::builder().user_agent("octo-test").build().unwrap();
        assert_eq!(config.base_address.as_str(), DEFAULT_BASE_ADDRESS);
        assert_eq!(config.accept, DEFAULT_ACCEPT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_config_builder() {
        let config = GitHubConfig::builder()
            .base_address(Url::parse("https://github.example.com/api/v3").unwrap())
            .user_agent("test-client/1.0")
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.base_address.as_str(), "https://github.example.com/api/v3/");
        assert_eq!(config.user_agent, "test-client/1.0");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_user_agent() {
        let error = GitHubConfig::builder().user_agent("  ").build().unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument);
    }

    #[test]
    fn test_invalid_base_address() {
        let result = GitHubConfig::builder()
            .base_address(Url::parse("ftp://github.example.com").unwrap())
            .user_agent("test-client/1.0")
            .build();

        assert_eq!(*result.unwrap_err().kind(), GitHubErrorKind::InvalidBaseUrl);
    }
}
