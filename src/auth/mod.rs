//! Credentials and the stores that supply them.

use crate::errors::{GitHubError, GitHubResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Environment variable read by [`EnvironmentCredentialStore::from_github_token`].
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    /// No credentials are sent.
    Anonymous,
    /// Login and password, sent as HTTP basic auth.
    Basic,
    /// OAuth or personal access token.
    Token,
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::Basic => f.write_str("basic"),
            Self::Token => f.write_str("token"),
        }
    }
}

/// Identity presented to the API.
///
/// Immutable; replacing credentials always substitutes a whole new value.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Unauthenticated access.
    Anonymous,
    /// Basic authentication.
    Basic {
        /// Account login.
        login: String,
        /// Account password.
        password: SecretString,
    },
    /// Token authentication.
    Token(SecretString),
}

impl Default for Credentials {
    fn default() -> Self {
        Self::Anonymous
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Anonymous, Self::Anonymous) => true,
            (
                Self::Basic { login, password },
                Self::Basic {
                    login: other_login,
                    password: other_password,
                },
            ) => login == other_login && password.expose_secret() == other_password.expose_secret(),
            (Self::Token(token), Self::Token(other)) => token.expose_secret() == other.expose_secret(),
            _ => false,
        }
    }
}

impl Eq for Credentials {}

impl Credentials {
    /// Creates basic credentials.
    pub fn basic(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            login: login.into(),
            password: SecretString::new(password.into()),
        }
    }

    /// Creates token credentials.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(SecretString::new(token.into()))
    }

    /// Gets the authentication type.
    pub fn authentication_type(&self) -> AuthenticationType {
        match self {
            Self::Anonymous => AuthenticationType::Anonymous,
            Self::Basic { .. } => AuthenticationType::Basic,
            Self::Token(_) => AuthenticationType::Token,
        }
    }

    /// Gets the login for basic credentials.
    pub fn login(&self) -> Option<&str> {
        match self {
            Self::Basic { login, .. } => Some(login),
            _ => None,
        }
    }

    /// Rejects credentials whose identity material is empty.
    pub fn validate(&self) -> GitHubResult<()> {
        match self {
            Self::Anonymous => Ok(()),
            Self::Basic { login, password } => {
                if login.is_empty() {
                    return Err(GitHubError::argument("credentials", "login must not be empty"));
                }
                if password.expose_secret().is_empty() {
                    return Err(GitHubError::argument(
                        "credentials",
                        "password must not be empty",
                    ));
                }
                Ok(())
            }
            Self::Token(token) if token.expose_secret().is_empty() => Err(GitHubError::argument(
                "credentials",
                "token must not be empty",
            )),
            Self::Token(_) => Ok(()),
        }
    }

    /// Renders the `Authorization` header value, if any.
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { login, password } => {
                let pair = format!("{}:{}", login, password.expose_secret());
                Some(format!("Basic {}", STANDARD.encode(pair)))
            }
            Self::Token(token) => Some(format!("Token {}", token.expose_secret())),
        }
    }
}

/// Supplies the credentials for outgoing requests.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the credentials that currently apply.
    async fn get_credentials(&self) -> GitHubResult<Credentials>;
}

/// Store holding one fixed credentials value.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    credentials: Credentials,
}

impl InMemoryCredentialStore {
    /// Creates a store returning `credentials` on every call.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Creates a store returning anonymous credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_credentials(&self) -> GitHubResult<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// Store that reads a token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvironmentCredentialStore {
    token_var: String,
}

impl EnvironmentCredentialStore {
    /// Creates a store reading `GITHUB_TOKEN`.
    pub fn from_github_token() -> Self {
        Self::from_env_var(GITHUB_TOKEN_VAR)
    }

    /// Creates a store reading a custom environment variable.
    pub fn from_env_var(var_name: impl Into<String>) -> Self {
        Self {
            token_var: var_name.into(),
        }
    }

    /// Gets the variable name.
    pub fn var_name(&self) -> &str {
        &self.token_var
    }
}

#[async_trait]
impl CredentialStore for EnvironmentCredentialStore {
    async fn get_credentials(&self) -> GitHubResult<Credentials> {
        match std::env::var(&self.token_var) {
            Ok(token) if !token.is_empty() => Ok(Credentials::token(token)),
            _ => {
                debug!(var = %self.token_var, "Token variable not set, using anonymous credentials");
                Ok(Credentials::Anonymous)
            }
        }
    }
}

/// The credential store currently installed on a connection.
///
/// Replacing the store is one pointer assignment under a write lock, so every
/// holder of the connection sees either the old store or the new one.
pub struct CredentialSlot {
    store: RwLock<Arc<dyn CredentialStore>>,
}

impl CredentialSlot {
    /// Creates a slot holding `store`.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    /// Gets the installed store.
    pub fn current(&self) -> Arc<dyn CredentialStore> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs a fresh in-memory store holding `credentials`.
    pub fn replace(&self, credentials: Credentials) {
        let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new(credentials));
        *self.store.write().unwrap_or_else(PoisonError::into_inner) = store;
    }

    /// Reads the credentials from the installed store.
    pub async fn credentials(&self) -> GitHubResult<Credentials> {
        let store = self.current();
        store.get_credentials().await
    }
}

impl Default for CredentialSlot {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryCredentialStore::anonymous()))
    }
}

impl fmt::Debug for CredentialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSlot").finish_non_exhaustive()
    }
}
