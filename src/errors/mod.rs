//! Error types for the GitHub client.
//!
//! Every fallible operation returns [`GitHubResult`]. The [`GitHubErrorKind`]
//! says what went wrong; HTTP failures also carry the status, GitHub's request
//! id and documentation link, and the rate limit state when the response
//! reported one.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type alias for GitHub operations.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitHubErrorKind {
    /// A required argument was absent or empty.
    InvalidArgument,
    /// A request object could not be turned into query parameters.
    SerializationError,
    /// The base address is not an http(s) URL usable as a base.
    InvalidBaseUrl,
    /// Transport settings were rejected.
    InvalidConfiguration,
    /// 401.
    BadCredentials,
    /// 403 without an exhausted rate limit.
    Forbidden,
    /// 400.
    ValidationError,
    /// 422.
    UnprocessableEntity,
    /// 404.
    NotFound,
    /// 410.
    Gone,
    /// 409.
    Conflict,
    /// 403 or 429 with `x-ratelimit-remaining: 0`.
    PrimaryRateLimitExceeded,
    /// 429 with quota left (abuse detection).
    SecondaryRateLimitExceeded,
    /// The server could not be reached.
    ConnectionFailed,
    /// The request did not finish in time.
    Timeout,
    /// 500.
    InternalError,
    /// 502.
    BadGateway,
    /// 503.
    ServiceUnavailable,
    /// A response body did not match the expected shape.
    DeserializationError,
    /// Anything else.
    Unknown,
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::SerializationError => "serialization_error",
            Self::InvalidBaseUrl => "invalid_base_url",
            Self::InvalidConfiguration => "invalid_configuration",
            Self::BadCredentials => "bad_credentials",
            Self::Forbidden => "forbidden",
            Self::ValidationError => "validation_error",
            Self::UnprocessableEntity => "unprocessable_entity",
            Self::NotFound => "not_found",
            Self::Gone => "gone",
            Self::Conflict => "conflict",
            Self::PrimaryRateLimitExceeded => "primary_rate_limit_exceeded",
            Self::SecondaryRateLimitExceeded => "secondary_rate_limit_exceeded",
            Self::ConnectionFailed => "connection_failed",
            Self::Timeout => "timeout",
            Self::InternalError => "internal_error",
            Self::BadGateway => "bad_gateway",
            Self::ServiceUnavailable => "service_unavailable",
            Self::DeserializationError => "deserialization_error",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl GitHubErrorKind {
    /// Maps a non-success HTTP status to a kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::ValidationError,
            401 => Self::BadCredentials,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            410 => Self::Gone,
            422 => Self::UnprocessableEntity,
            429 => Self::SecondaryRateLimitExceeded,
            500 => Self::InternalError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            _ => Self::Unknown,
        }
    }

    /// Returns true for mistakes the caller made before anything was sent.
    pub fn is_caller_error(self) -> bool {
        matches!(
            self,
            Self::InvalidArgument
                | Self::SerializationError
                | Self::InvalidBaseUrl
                | Self::InvalidConfiguration
        )
    }

    /// Returns true for either rate limit.
    pub fn is_rate_limit(self) -> bool {
        matches!(
            self,
            Self::PrimaryRateLimitExceeded | Self::SecondaryRateLimitExceeded
        )
    }
}

/// Rate limit state from the `x-ratelimit-*` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset_at: DateTime<Utc>,
    /// `retry-after`, in seconds.
    pub retry_after: Option<u64>,
    /// `x-ratelimit-resource` (core, search, graphql, ...).
    pub resource: Option<String>,
}

/// Error returned by every client operation.
#[derive(Error, Debug)]
pub struct GitHubError {
    kind: GitHubErrorKind,
    message: String,
    status_code: Option<u16>,
    request_id: Option<String>,
    documentation_url: Option<String>,
    rate_limit: Option<RateLimitInfo>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        match (self.status_code, self.request_id.as_deref()) {
            (Some(code), Some(id)) => write!(f, " (HTTP {}, request {})", code, id),
            (Some(code), None) => write!(f, " (HTTP {})", code),
            (None, Some(id)) => write!(f, " (request {})", id),
            (None, None) => Ok(()),
        }
    }
}

impl GitHubError {
    /// Creates an error of `kind`.
    pub fn new(kind: GitHubErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            request_id: None,
            documentation_url: None,
            rate_limit: None,
            cause: None,
        }
    }

    /// Creates an error for an absent or empty required argument.
    ///
    /// The message is prefixed with the argument name.
    pub fn argument(name: &str, message: impl Into<String>) -> Self {
        let message = format!("{}: {}", name, message.into());
        Self::new(GitHubErrorKind::InvalidArgument, message)
    }

    /// Creates a parameter serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::SerializationError, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidConfiguration, message)
    }

    /// Creates a 404 error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::NotFound, message).with_status(404)
    }

    /// Creates a primary rate limit error.
    pub fn rate_limited(info: RateLimitInfo) -> Self {
        let message = format!(
            "API rate limit of {} exhausted until {}",
            info.limit,
            info.reset_at.to_rfc3339()
        );
        Self::new(GitHubErrorKind::PrimaryRateLimitExceeded, message).with_rate_limit(info)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::Timeout, message)
    }

    /// Creates a response decoding error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::DeserializationError, message)
    }

    /// Creates an error for a non-success status.
    pub fn from_response(
        status: u16,
        message: String,
        documentation_url: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            status_code: Some(status),
            documentation_url,
            request_id,
            ..Self::new(GitHubErrorKind::from_status(status), message)
        }
    }

    /// Sets the HTTP status.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the `x-github-request-id`.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the documentation link.
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Attaches rate limit state.
    pub fn with_rate_limit(mut self, info: RateLimitInfo) -> Self {
        self.rate_limit = Some(info);
        self
    }

    /// Attaches the underlying error.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the kind.
    pub fn kind(&self) -> &GitHubErrorKind {
        &self.kind
    }

    /// Gets the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the HTTP status.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the `x-github-request-id`.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the documentation link.
    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    /// Gets the rate limit state.
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    /// Returns true if the same call might succeed later.
    ///
    /// Informational; the client never retries.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_rate_limit()
            || matches!(
                self.kind,
                GitHubErrorKind::ConnectionFailed
                    | GitHubErrorKind::Timeout
                    | GitHubErrorKind::InternalError
                    | GitHubErrorKind::BadGateway
                    | GitHubErrorKind::ServiceUnavailable
            )
    }
}
