//! Organization operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::types::Organization;
use std::sync::Arc;

/// Client for organization operations.
#[derive(Clone)]
pub struct OrganizationsClient {
    api: ApiConnection,
}

impl OrganizationsClient {
    /// Creates a new organizations client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Gets an organization.
    pub async fn get(&self, org: &str) -> GitHubResult<Organization> {
        self.api.get(&api_path(&["orgs", org])?).await
    }

    /// Lists organizations for the authenticated user.
    pub async fn get_all_for_current(&self) -> GitHubResult<Vec<Organization>> {
        self.api.get("/user/orgs").await
    }

    /// Lists public organization memberships for a user.
    pub async fn get_all(&self, login: &str) -> GitHubResult<Vec<Organization>> {
        self.api.get(&api_path(&["users", login, "orgs"])?).await
    }
}
