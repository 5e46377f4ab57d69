//! The shared connection every resource client talks through.

use crate::auth::{CredentialSlot, CredentialStore, Credentials};
use crate::config::GitHubConfig;
use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult, RateLimitInfo};
use crate::observability::TracingHooks;
use crate::parameters::{Parameters, RequestParameters};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::DateTime;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Connection to one API endpoint with one credential strategy.
///
/// A [`GitHubClient`](crate::GitHubClient) owns exactly one connection and
/// hands the same instance to every resource client it builds.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Gets the base address requests are resolved against.
    fn base_address(&self) -> &Url;

    /// Gets the User-Agent sent with every request.
    fn user_agent(&self) -> &str;

    /// Gets the installed credential store.
    fn credential_store(&self) -> Arc<dyn CredentialStore>;

    /// Replaces the credential store with an in-memory store holding `credentials`.
    fn set_credentials(&self, credentials: Credentials);

    /// Reads the current credentials from the installed store.
    async fn credentials(&self) -> GitHubResult<Credentials> {
        let store = self.credential_store();
        store.get_credentials().await
    }

    /// Sends a request. Non-success statuses come back as errors.
    async fn send(&self, request: ApiRequest) -> GitHubResult<ApiResponse>;
}

/// Request body with its media type.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    content_type: String,
    bytes: Bytes,
}

impl RequestBody {
    /// Gets the media type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Gets the raw bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Gets the body as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// A request relative to the connection's base address.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    parameters: Parameters,
    body: Option<RequestBody>,
    accept: Option<String>,
}

impl ApiRequest {
    /// Creates a request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            parameters: Parameters::new(),
            body: None,
            accept: None,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets the query parameters.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets a JSON body.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> GitHubResult<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::SerializationError,
                format!("Failed to serialize request body: {}", e),
            )
        })?;
        self.body = Some(RequestBody {
            content_type: "application/json".to_string(),
            bytes: Bytes::from(bytes),
        });
        Ok(self)
    }

    /// Sets a text body with the given media type.
    pub fn with_text(mut self, content_type: impl Into<String>, text: impl Into<String>) -> Self {
        self.body = Some(RequestBody {
            content_type: content_type.into(),
            bytes: Bytes::from(text.into()),
        });
        self
    }

    /// Overrides the Accept media type.
    pub fn with_accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept = Some(media_type.into());
        self
    }

    /// Gets the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Gets the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Gets the query parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Gets the body.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Gets the Accept override.
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
    message: String,
    documentation_url: Option<String>,
    errors: Option<Vec<GitHubValidationError>>,
}

#[derive(Debug, Deserialize)]
struct GitHubValidationError {
    field: Option<String>,
    code: Option<String>,
}

/// A response with its headers and body fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl ApiResponse {
    /// Creates a response. Header names are stored lower-cased.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Gets the status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Gets a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Gets all headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Gets the raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Gets the GitHub request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-github-request-id")
    }

    /// Decodes the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> GitHubResult<T> {
        let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
        serde_json::from_slice(body).map_err(|e| {
            GitHubError::deserialization(format!("Failed to deserialize response: {}", e))
                .with_status(self.status)
        })
    }

    /// Decodes the body as UTF-8 text.
    pub fn text(&self) -> GitHubResult<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| {
            GitHubError::deserialization(format!("Response body is not UTF-8: {}", e))
                .with_status(self.status)
        })
    }

    /// Reads the rate limit headers.
    pub fn rate_limit(&self) -> Option<RateLimitInfo> {
        let limit = self.header("x-ratelimit-limit")?.parse().ok()?;
        let remaining = self.header("x-ratelimit-remaining")?.parse().ok()?;
        let reset_timestamp: i64 = self.header("x-ratelimit-reset")?.parse().ok()?;
        let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

        Some(RateLimitInfo {
            limit,
            remaining,
            reset_at,
            retry_after: self.header("retry-after").and_then(|v| v.parse().ok()),
            resource: self.header("x-ratelimit-resource").map(String::from),
        })
    }

    /// Turns a non-success response into a [`GitHubError`].
    pub fn error_for_status(self) -> GitHubResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let rate_limit = self.rate_limit();
        if self.status == 403 || self.status == 429 {
            if let Some(info) = rate_limit.as_ref().filter(|info| info.remaining == 0) {
                TracingHooks::on_rate_limit_exceeded(info);
                let mut error = GitHubError::rate_limited(info.clone()).with_status(self.status);
                if let Some(id) = self.request_id() {
                    error = error.with_request_id(id);
                }
                return Err(error);
            }
        }

        let error_body = serde_json::from_slice::<GitHubErrorResponse>(&self.body).ok();

        let mut message = error_body
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("HTTP {} error", self.status));

        if let Some(errors) = error_body.as_ref().and_then(|e| e.errors.as_ref()) {
            let details: Vec<String> = errors
                .iter()
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.field.as_deref().unwrap_or("-"),
                        e.code.as_deref().unwrap_or("invalid")
                    )
                })
                .collect();
            if !details.is_empty() {
                message = format!("{} ({})", message, details.join(", "));
            }
        }

        let mut error = GitHubError::from_response(
            self.status,
            message,
            error_body.and_then(|e| e.documentation_url),
            self.request_id().map(String::from),
        );

        if let Some(info) = rate_limit {
            error = error.with_rate_limit(info);
        }

        Err(error)
    }
}

/// [`Connection`] over HTTP.
pub struct HttpConnection {
    http: Client,
    config: GitHubConfig,
    credentials: CredentialSlot,
}

impl HttpConnection {
    /// Creates a connection from validated settings and a credential store.
    pub fn new(config: GitHubConfig, credential_store: Arc<dyn CredentialStore>) -> GitHubResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                GitHubError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            config,
            credentials: CredentialSlot::new(credential_store),
        })
    }

    /// Gets the settings.
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Appends `path` to the base address one segment at a time.
    ///
    /// Each segment is percent-encoded, so `?` and `#` cannot start a query or
    /// fragment. Empty, `.` and `..` segments are rejected so a path can never
    /// leave the base address.
    fn build_url(&self, path: &str, parameters: &Parameters) -> GitHubResult<Url> {
        let mut url = self.config.base_address.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GitHubError::new(
                    GitHubErrorKind::InvalidBaseUrl,
                    format!("{} cannot be used as a base address", self.config.base_address),
                )
            })?;
            segments.pop_if_empty();
            for segment in path.trim_start_matches('/').split('/') {
                check_segment(segment)?;
                segments.push(segment);
            }
        }

        if !parameters.is_empty() {
            url.set_query(Some(&parameters.to_query_string()?));
        }

        Ok(url)
    }
}

fn check_segment(segment: &str) -> GitHubResult<()> {
    match segment {
        "" => Err(GitHubError::argument("path", "path segments must not be empty")),
        "." | ".." => Err(GitHubError::argument(
            "path",
            format!("'{}' is not allowed as a path segment", segment),
        )),
        _ => Ok(()),
    }
}

/// Builds an API path from its segments, e.g. `["repos", owner, name]`.
///
/// Caller-supplied values become exactly one segment each: a value that is
/// empty, `.`, `..`, or contains `/` is rejected with an invalid-argument error.
pub fn api_path(segments: &[&str]) -> GitHubResult<String> {
    let mut path = String::new();
    for segment in segments {
        check_segment(segment)?;
        if segment.contains('/') {
            return Err(GitHubError::argument(
                "path",
                format!("'{}' must not contain '/'", segment),
            ));
        }
        path.push('/');
        path.push_str(segment);
    }
    Ok(path)
}

#[async_trait]
impl Connection for HttpConnection {
    fn base_address(&self) -> &Url {
        &self.config.base_address
    }

    fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    fn credential_store(&self) -> Arc<dyn CredentialStore> {
        self.credentials.current()
    }

    fn set_credentials(&self, credentials: Credentials) {
        self.credentials.replace(credentials);
    }

    async fn send(&self, request: ApiRequest) -> GitHubResult<ApiResponse> {
        let credentials = self.credentials.credentials().await?;
        let url = self.build_url(request.path(), request.parameters())?;
        let method = request.method().clone();

        TracingHooks::on_request_start(method.as_str(), url.as_str());
        let started = Instant::now();

        let accept = request.accept().unwrap_or(&self.config.accept);
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, accept);

        if let Some(value) = credentials.authorization_header() {
            builder = builder.header(AUTHORIZATION, value);
        }

        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, body.content_type())
                .body(body.bytes().clone());
        }

        let response = builder.send().await.map_err(|e| {
            let error = if e.is_timeout() {
                GitHubError::timeout(format!("Request timed out: {}", e))
            } else if e.is_connect() {
                GitHubError::new(
                    GitHubErrorKind::ConnectionFailed,
                    format!("Connection failed: {}", e),
                )
            } else {
                GitHubError::new(GitHubErrorKind::Unknown, format!("Request failed: {}", e))
            };
            TracingHooks::on_request_error(method.as_str(), url.as_str(), &error);
            error
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::ConnectionFailed,
                format!("Failed to read response body: {}", e),
            )
        })?;

        TracingHooks::on_request_complete(method.as_str(), url.as_str(), status, started.elapsed());

        ApiResponse::new(status, headers, body)
            .error_for_status()
            .map_err(|error| {
                TracingHooks::on_request_error(method.as_str(), url.as_str(), &error);
                error
            })
    }
}

/// Typed JSON calls over a shared [`Connection`].
#[derive(Clone)]
pub struct ApiConnection {
    connection: Arc<dyn Connection>,
}

impl ApiConnection {
    /// Wraps a shared connection.
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GitHubResult<T> {
        self.connection.send(ApiRequest::get(path)).await?.json()
    }

    /// Makes a GET request with query parameters built from `request`.
    pub async fn get_with_parameters<T: DeserializeOwned, P: RequestParameters>(
        &self,
        path: &str,
        request: &P,
    ) -> GitHubResult<T> {
        let request = ApiRequest::get(path).with_parameters(request.to_parameters()?);
        self.connection.send(request).await?.json()
    }

    /// Makes a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> GitHubResult<T> {
        let request = ApiRequest::post(path).with_json(body)?;
        self.connection.send(request).await?.json()
    }

    /// Makes a PATCH request.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> GitHubResult<T> {
        let request = ApiRequest::patch(path).with_json(body)?;
        self.connection.send(request).await?.json()
    }

    /// Makes a PUT request with no body and no response content.
    pub async fn put_no_content(&self, path: &str) -> GitHubResult<()> {
        self.connection.send(ApiRequest::put(path)).await?;
        Ok(())
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> GitHubResult<()> {
        self.connection.send(ApiRequest::delete(path)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryCredentialStore;

    fn connection(base: &str) -> HttpConnection {
        let config = GitHubConfig::builder()
            .base_address(Url::parse(base).unwrap())
            .user_agent("octo-test")
            .build()
            .unwrap();
        HttpConnection::new(config, Arc::new(InMemoryCredentialStore::anonymous())).unwrap()
    }

    #[test]
    fn test_build_url() {
        let connection = connection("https://api.github.com");

        assert_eq!(
            connection.build_url("/repos/owner/repo", &Parameters::new()).unwrap().as_str(),
            "https://api.github.com/repos/owner/repo"
        );
        assert_eq!(
            connection.build_url("repos/owner/repo", &Parameters::new()).unwrap().as_str(),
            "https://api.github.com/repos/owner/repo"
        );
    }

    #[test]
    fn test_build_url_rejects_dot_segments() {
        let connection = connection("https://ghe.example.com/api/v3");

        for path in ["/users/../../../admin/repos", "/repos/./a", "/users//repos"] {
            let error = connection.build_url(path, &Parameters::new()).unwrap_err();
            assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument, "{}", path);
        }
    }

    #[test]
    fn test_build_url_encodes_query_and_fragment_characters() {
        let connection = connection("https://ghe.example.com/api/v3");

        let url = connection.build_url("/repos/a/b?evil=1", &Parameters::new()).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/a/b%3Fevil=1");
        assert!(url.query().is_none());

        let url = connection.build_url("/repos/a/b#top", &Parameters::new()).unwrap();
        assert_eq!(url.path(), "/api/v3/repos/a/b%23top");
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_api_path() {
        assert_eq!(
            api_path(&["repos", "octocat", "Hello-World"]).unwrap(),
            "/repos/octocat/Hello-World"
        );

        for login in ["x/../../orgs/acme", "a/b", "..", "."] {
            let error = api_path(&["users", login, "repos"]).unwrap_err();
            assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument, "{}", login);
        }
    }

    #[test]
    fn test_build_url_keeps_enterprise_prefix() {
        let connection = connection("https://ghe.example.com/api/v3");
        let parameters: Parameters = vec![("type", "owner"), ("sort", "full_name")]
            .into_iter()
            .collect();

        assert_eq!(
            connection.build_url("/user/repos", &parameters).unwrap().as_str(),
            "https://ghe.example.com/api/v3/user/repos?type=owner&sort=full_name"
        );
    }

    #[test]
    fn test_response_rate_limit() {
        let headers = HashMap::from([
            ("X-RateLimit-Limit".to_string(), "5000".to_string()),
            ("X-RateLimit-Remaining".to_string(), "4999".to_string()),
            ("X-RateLimit-Reset".to_string(), "1700000000".to_string()),
        ]);
        let response = ApiResponse::new(200, headers, Bytes::new());
        let info = response.rate_limit().unwrap();

        assert_eq!(info.limit, 5000);
        assert_eq!(info.remaining, 4999);
        assert_eq!(info.reset_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_error_for_status_parses_body() {
        let headers = HashMap::from([("x-github-request-id".to_string(), "req-1".to_string())]);
        let body = r#"{"message":"Validation Failed","documentation_url":"https://docs.github.com/rest","errors":[{"resource":"Repository","field":"name","code":"missing_field"}]}"#;
        let error = ApiResponse::new(422, headers, body).error_for_status().unwrap_err();

        assert_eq!(*error.kind(), GitHubErrorKind::UnprocessableEntity);
        assert_eq!(error.message(), "Validation Failed (name: missing_field)");
        assert_eq!(error.request_id(), Some("req-1"));
        assert_eq!(error.documentation_url(), Some("https://docs.github.com/rest"));
    }

    #[test]
    fn test_error_for_status_rate_limited() {
        let headers = HashMap::from([
            ("x-ratelimit-limit".to_string(), "60".to_string()),
            ("x-ratelimit-remaining".to_string(), "0".to_string()),
            ("x-ratelimit-reset".to_string(), "1700000000".to_string()),
        ]);
        let error = ApiResponse::new(403, headers, "{}").error_for_status().unwrap_err();

        assert_eq!(*error.kind(), GitHubErrorKind::PrimaryRateLimitExceeded);
        assert_eq!(error.rate_limit().map(|r| r.remaining), Some(0));
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let response = ApiResponse::new(204, HashMap::new(), Bytes::new());
        response.json::<()>().unwrap();
        let missing: Option<u32> = response.json().unwrap();
        assert!(missing.is_none());
    }
}
