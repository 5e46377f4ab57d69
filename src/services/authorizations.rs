//! OAuth authorization operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::types::Authorization;
use serde::Serialize;
use std::sync::Arc;

/// Client for the OAuth authorizations of the authenticated user.
///
/// These endpoints only accept basic credentials.
#[derive(Clone)]
pub struct AuthorizationsClient {
    api: ApiConnection,
}

impl AuthorizationsClient {
    /// Creates a new authorizations client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Lists authorizations.
    pub async fn get_all(&self) -> GitHubResult<Vec<Authorization>> {
        self.api.get("/authorizations").await
    }

    /// Gets an authorization.
    pub async fn get(&self, id: u64) -> GitHubResult<Authorization> {
        self.api.get(&api_path(&["authorizations", &id.to_string()])?).await
    }

    /// Creates an authorization.
    pub async fn create(&self, authorization: &NewAuthorization) -> GitHubResult<Authorization> {
        self.api.post("/authorizations", authorization).await
    }

    /// Updates an authorization.
    pub async fn update(
        &self,
        id: u64,
        update: &AuthorizationUpdate,
    ) -> GitHubResult<Authorization> {
        self.api
            .patch(&api_path(&["authorizations", &id.to_string()])?, update)
            .await
    }

    /// Deletes an authorization.
    pub async fn delete(&self, id: u64) -> GitHubResult<()> {
        self.api.delete(&api_path(&["authorizations", &id.to_string()])?).await
    }
}

/// Authorization to create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAuthorization {
    /// Requested scopes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Note shown in the user's settings.
    pub note: String,
    /// URL explaining the note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_url: Option<String>,
}

/// Changes to an authorization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthorizationUpdate {
    /// Replaces the scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    /// Adds scopes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_scopes: Vec<String>,
    /// Removes scopes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_scopes: Vec<String>,
    /// Note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
