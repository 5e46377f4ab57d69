//! The client facade: one connection, one credential strategy, every resource client.

use crate::auth::{CredentialStore, Credentials, InMemoryCredentialStore};
use crate::config::GitHubConfig;
use crate::connection::{ApiConnection, Connection, HttpConnection};
use crate::errors::{GitHubError, GitHubResult};
use crate::observability::TracingHooks;
use crate::services::*;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the GitHub v3 API.
///
/// Owns one [`Connection`]; every resource client is built once, at
/// construction, over that same connection. Changing the credentials through
/// [`set_credentials`](Self::set_credentials) is therefore seen by all of them.
pub struct GitHubClient {
    connection: Arc<dyn Connection>,
    authorization: AuthorizationsClient,
    miscellaneous: MiscellaneousClient,
    notification: NotificationsClient,
    organization: OrganizationsClient,
    repository: RepositoriesClient,
    release: ReleasesClient,
    ssh_key: SshKeysClient,
    user: UsersClient,
}

impl GitHubClient {
    /// Creates a client for `https://api.github.com/` with anonymous credentials.
    pub fn new(user_agent: impl Into<String>) -> GitHubResult<Self> {
        Self::builder().user_agent(user_agent).build()
    }

    /// Creates a client for `https://api.github.com/` using `credential_store`.
    pub fn with_credential_store(
        user_agent: impl Into<String>,
        credential_store: Arc<dyn CredentialStore>,
    ) -> GitHubResult<Self> {
        Self::builder()
            .user_agent(user_agent)
            .credential_store(credential_store)
            .build()
    }

    /// Creates a client for another server, e.g. GitHub Enterprise.
    pub fn with_base_address(user_agent: impl Into<String>, base_address: Url) -> GitHubResult<Self> {
        Self::builder()
            .user_agent(user_agent)
            .base_address(base_address)
            .build()
    }

    /// Creates a client for another server using `credential_store`.
    pub fn with_credential_store_and_base_address(
        user_agent: impl Into<String>,
        credential_store: Arc<dyn CredentialStore>,
        base_address: Url,
    ) -> GitHubResult<Self> {
        Self::builder()
            .user_agent(user_agent)
            .credential_store(credential_store)
            .base_address(base_address)
            .build()
    }

    /// Wraps an existing connection without creating a new one.
    pub fn from_connection(connection: Arc<dyn Connection>) -> Self {
        TracingHooks::on_client_created(connection.base_address().as_str(), connection.user_agent());

        let api = || ApiConnection::new(connection.clone());

        Self {
            authorization: AuthorizationsClient::new(api()),
            miscellaneous: MiscellaneousClient::new(connection.clone()),
            notification: NotificationsClient::new(api()),
            organization: OrganizationsClient::new(api()),
            repository: RepositoriesClient::new(api()),
            release: ReleasesClient::new(api()),
            ssh_key: SshKeysClient::new(api()),
            user: UsersClient::new(api()),
            connection,
        }
    }

    /// Creates a new client builder.
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Gets the current credentials.
    pub async fn credentials(&self) -> GitHubResult<Credentials> {
        self.connection.credentials().await
    }

    /// Replaces the credentials on the shared connection.
    ///
    /// Installs an in-memory credential store holding `credentials` in place of
    /// whatever store was configured. Credentials with an empty login, password
    /// or token are rejected and the previous credentials stay in effect.
    pub fn set_credentials(&self, credentials: Credentials) -> GitHubResult<()> {
        credentials.validate()?;
        let authentication_type = credentials.authentication_type();
        self.connection.set_credentials(credentials);
        TracingHooks::on_credentials_replaced(authentication_type);
        Ok(())
    }

    /// Gets the base address of the API.
    pub fn base_address(&self) -> &Url {
        self.connection.base_address()
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    // Resource clients

    /// Gets the authorizations client.
    pub fn authorization(&self) -> &AuthorizationsClient {
        &self.authorization
    }

    /// Gets the miscellaneous client.
    pub fn miscellaneous(&self) -> &MiscellaneousClient {
        &self.miscellaneous
    }

    /// Gets the notifications client.
    pub fn notification(&self) -> &NotificationsClient {
        &self.notification
    }

    /// Gets the organizations client.
    pub fn organization(&self) -> &OrganizationsClient {
        &self.organization
    }

    /// Gets the repositories client.
    pub fn repository(&self) -> &RepositoriesClient {
        &self.repository
    }

    /// Gets the releases client.
    pub fn release(&self) -> &ReleasesClient {
        &self.release
    }

    /// Gets the SSH keys client.
    pub fn ssh_key(&self) -> &SshKeysClient {
        &self.ssh_key
    }

    /// Gets the users client.
    pub fn user(&self) -> &UsersClient {
        &self.user
    }
}

/// Builder for GitHubClient.
#[derive(Default)]
pub struct GitHubClientBuilder {
    user_agent: Option<String>,
    base_address: Option<Url>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    connection: Option<Arc<dyn Connection>>,
}

impl GitHubClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the base address.
    pub fn base_address(mut self, url: Url) -> Self {
        self.base_address = Some(url);
        self
    }

    /// Sets the credential store.
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    /// Uses fixed credentials.
    pub fn credentials(self, credentials: Credentials) -> Self {
        self.credential_store(Arc::new(InMemoryCredentialStore::new(credentials)))
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

    /// Uses a pre-built connection; every other setting is ignored.
    pub fn connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Builds the client.
    ///
    /// Fails with an invalid-argument error when neither a connection nor a
    /// User-Agent was supplied.
    pub fn build(self) -> GitHubResult<GitHubClient> {
        if let Some(connection) = self.connection {
            return Ok(GitHubClient::from_connection(connection));
        }

        let user_agent = self.user_agent.ok_or_else(|| {
            GitHubError::argument("connection", "either a connection or a user agent is required")
        })?;

        let mut config = GitHubConfig::builder().user_agent(user_agent);
        if let Some(url) = self.base_address {
            config = config.base_address(url);
        }
        if let Some(timeout) = self.timeout {
            config = config.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.connect_timeout(timeout);
        }

        let credential_store = self
            .credential_store
            .unwrap_or_else(|| Arc::new(InMemoryCredentialStore::anonymous()));

        let connection = HttpConnection::new(config.build()?, credential_store)?;
        Ok(GitHubClient::from_connection(Arc::new(connection)))
    }
}
