//! User operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::types::User;
use serde::Serialize;
use std::sync::Arc;

/// Client for user operations.
#[derive(Clone)]
pub struct UsersClient {
    api: ApiConnection,
}

impl UsersClient {
    /// Creates a new users client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Gets the authenticated user.
    pub async fn current(&self) -> GitHubResult<User> {
        self.api.get("/user").await
    }

    /// Gets a user by login.
    pub async fn get(&self, login: &str) -> GitHubResult<User> {
        self.api.get(&api_path(&["users", login])?).await
    }

    /// Updates the authenticated user.
    pub async fn update(&self, update: &UserUpdate) -> GitHubResult<User> {
        self.api.patch("/user", update).await
    }
}

/// Profile changes for the authenticated user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    /// Name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Blog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Hireable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hireable: Option<bool>,
    /// Bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}
