//! Structured `tracing` events emitted by the client.
//!
//! The crate never installs a subscriber; applications choose where events go.

use crate::auth::AuthenticationType;
use crate::errors::{GitHubError, RateLimitInfo};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tracing hooks for GitHub API operations.
pub struct TracingHooks;

impl TracingHooks {
    /// Logs the start of an API request.
    pub fn on_request_start(method: &str, url: &str) {
        debug!(
            method = %method,
            url = %url,
            "GitHub API request started"
        );
    }

    /// Logs the completion of an API request.
    pub fn on_request_complete(method: &str, url: &str, status: u16, duration: Duration) {
        info!(
            method = %method,
            url = %url,
            status = status,
            duration_ms = duration.as_millis() as u64,
            "GitHub API request completed"
        );
    }

    /// Logs a request error.
    pub fn on_request_error(method: &str, url: &str, err: &GitHubError) {
        error!(
            method = %method,
            url = %url,
            kind = %err.kind(),
            status = err.status_code(),
            error = %err,
            "GitHub API request failed"
        );
    }

    /// Logs rate limit exhaustion.
    pub fn on_rate_limit_exceeded(info: &RateLimitInfo) {
        warn!(
            limit = info.limit,
            remaining = info.remaining,
            reset_at = %info.reset_at,
            resource = info.resource.as_deref().unwrap_or("core"),
            "Rate limit exceeded"
        );
    }

    /// Logs construction of a client facade.
    pub fn on_client_created(base_address: &str, user_agent: &str) {
        info!(
            base_address = %base_address,
            user_agent = %user_agent,
            "GitHub client created"
        );
    }

    /// Logs a credentials replacement. Only the authentication type is recorded.
    pub fn on_credentials_replaced(authentication_type: AuthenticationType) {
        info!(
            authentication_type = %authentication_type,
            "GitHub client credentials replaced"
        );
    }
}
