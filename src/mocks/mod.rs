//! In-memory [`Connection`] for testing code built on the client.

use crate::auth::{CredentialSlot, CredentialStore, Credentials};
use crate::config::default_base_address;
use crate::connection::{ApiRequest, ApiResponse, Connection};
use crate::errors::GitHubResult;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
    /// Headers.
    pub headers: HashMap<String, String>,
}

impl MockResponse {
    fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::new(
            status,
            serde_json::json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            })
            .to_string(),
        )
    }

    /// Creates a 200 OK response with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if `body` cannot be serialized.
    pub fn ok<T: Serialize + ?Sized>(body: &T) -> Self {
        Self::new(200, serde_json::to_vec(body).expect("mock body serializes"))
    }

    /// Creates a 201 Created response with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if `body` cannot be serialized.
    pub fn created<T: Serialize + ?Sized>(body: &T) -> Self {
        Self::new(201, serde_json::to_vec(body).expect("mock body serializes"))
    }

    /// Creates a 204 No Content response.
    pub fn no_content() -> Self {
        Self::new(204, Bytes::new())
    }

    /// Creates a 200 OK response with a raw text body.
    pub fn text(content_type: &str, body: impl Into<String>) -> Self {
        Self::new(200, body.into()).with_header("content-type", content_type)
    }

    /// Creates a 401 Unauthorized response.
    pub fn unauthorized(message: &str) -> Self {
        Self::error(401, message)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(message: &str) -> Self {
        Self::error(404, message)
    }

    /// Creates a 422 response with per-field errors.
    pub fn validation_failed(message: &str, errors: &[(&str, &str)]) -> Self {
        let errors: Vec<_> = errors
            .iter()
            .map(|(field, code)| serde_json::json!({ "field": field, "code": code }))
            .collect();
        Self::new(
            422,
            serde_json::json!({ "message": message, "errors": errors }).to_string(),
        )
    }

    /// Creates a 403 response with exhausted rate limit headers.
    pub fn rate_limited() -> Self {
        let reset_at = Utc::now() + Duration::minutes(1);
        Self::error(403, "API rate limit exceeded")
            .with_rate_limit(5000, 0, reset_at.timestamp())
            .with_header("retry-after", "60")
    }

    /// Adds a header.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds rate limit headers.
    pub fn with_rate_limit(self, limit: u32, remaining: u32, reset_timestamp: i64) -> Self {
        self.with_header("x-ratelimit-limit", &limit.to_string())
            .with_header("x-ratelimit-remaining", &remaining.to_string())
            .with_header("x-ratelimit-reset", &reset_timestamp.to_string())
    }
}

/// A request seen by [`MockConnection`], with the credentials in effect when it was sent.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The request.
    pub request: ApiRequest,
    /// Credentials read from the store at send time.
    pub credentials: Credentials,
}

/// [`Connection`] that answers from queued responses and records every request.
///
/// Responses are keyed by method and path, e.g. `on("GET", "/user", ...)`, and
/// served in the order they were queued. A request with nothing queued gets a
/// 404.
pub struct MockConnection {
    base_address: Url,
    user_agent: String,
    credentials: CredentialSlot,
    responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnection {
    /// Creates a mock for the public API with anonymous credentials.
    pub fn new() -> Self {
        Self {
            base_address: default_base_address(),
            user_agent: "mock-connection".to_string(),
            credentials: CredentialSlot::default(),
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sets the base address.
    pub fn with_base_address(mut self, base_address: Url) -> Self {
        self.base_address = base_address;
        self
    }

    /// Sets the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the credential store.
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = CredentialSlot::new(store);
        self
    }

    /// Queues a response for `method` and `path`.
    pub fn on(&self, method: &str, path: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(route(method, path))
            .or_default()
            .push_back(response);
    }

    /// Queues a GET response.
    pub fn on_get(&self, path: &str, response: MockResponse) {
        self.on("GET", path, response);
    }

    /// Queues a POST response.
    pub fn on_post(&self, path: &str, response: MockResponse) {
        self.on("POST", path, response);
    }

    /// Queues a PATCH response.
    pub fn on_patch(&self, path: &str, response: MockResponse) {
        self.on("PATCH", path, response);
    }

    /// Queues a DELETE response.
    pub fn on_delete(&self, path: &str, response: MockResponse) {
        self.on("DELETE", path, response);
    }

    /// Gets every recorded request, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Gets the most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn route(method: &str, path: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), path)
}

#[async_trait]
impl Connection for MockConnection {
    fn base_address(&self) -> &Url {
        &self.base_address
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn credential_store(&self) -> Arc<dyn CredentialStore> {
        self.credentials.current()
    }

    fn set_credentials(&self, credentials: Credentials) {
        self.credentials.replace(credentials);
    }

    async fn send(&self, request: ApiRequest) -> GitHubResult<ApiResponse> {
        let credentials = self.credentials.credentials().await?;
        let key = route(request.method().as_str(), request.path());

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                request,
                credentials,
            });

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| MockResponse::not_found(&format!("No mock response for {}", key)));

        ApiResponse::new(response.status, response.headers, response.body).error_for_status()
    }
}
