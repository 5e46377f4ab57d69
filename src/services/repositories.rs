//! Repository operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::types::Repository;
use crate::{parameter_enum, request_parameters};
use serde::Serialize;
use std::sync::Arc;

/// Client for repository operations.
#[derive(Clone)]
pub struct RepositoriesClient {
    api: ApiConnection,
}

impl RepositoriesClient {
    /// Creates a new repositories client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Gets a repository.
    pub async fn get(&self, owner: &str, name: &str) -> GitHubResult<Repository> {
        self.api.get(&api_path(&["repos", owner, name])?).await
    }

    /// Lists repositories for the authenticated user.
    pub async fn get_all_for_current(
        &self,
        request: &RepositoryRequest,
    ) -> GitHubResult<Vec<Repository>> {
        self.api.get_with_parameters("/user/repos", request).await
    }

    /// Lists public repositories for a user.
    pub async fn get_all_for_user(
        &self,
        login: &str,
        request: &RepositoryRequest,
    ) -> GitHubResult<Vec<Repository>> {
        self.api
            .get_with_parameters(&api_path(&["users", login, "repos"])?, request)
            .await
    }

    /// Lists repositories for an organization.
    pub async fn get_all_for_org(&self, org: &str) -> GitHubResult<Vec<Repository>> {
        self.api.get(&api_path(&["orgs", org, "repos"])?).await
    }

    /// Creates a repository for the authenticated user.
    pub async fn create(&self, repository: &NewRepository) -> GitHubResult<Repository> {
        self.api.post("/user/repos", repository).await
    }

    /// Creates a repository in an organization.
    pub async fn create_for_org(
        &self,
        org: &str,
        repository: &NewRepository,
    ) -> GitHubResult<Repository> {
        self.api
            .post(&api_path(&["orgs", org, "repos"])?, repository)
            .await
    }

    /// Deletes a repository.
    pub async fn delete(&self, owner: &str, name: &str) -> GitHubResult<()> {
        self.api.delete(&api_path(&["repos", owner, name])?).await
    }
}

parameter_enum! {
    /// Repository type filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum RepositoryType {
        /// Every repository the user can see.
        #[default]
        All,
        /// Repositories owned by the user.
        Owner,
        /// Public repositories.
        Public,
        /// Private repositories.
        Private,
        /// Repositories the user collaborates on.
        Member,
    }
}

parameter_enum! {
    /// Repository sort field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum RepositorySort {
        /// Creation time.
        #[default]
        Created,
        /// Last update time.
        Updated,
        /// Last push time.
        Pushed,
        /// Owner and name.
        FullName => "full_name",
    }
}

parameter_enum! {
    /// Sort direction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum SortDirection {
        /// Ascending.
        #[default]
        Ascending => "asc",
        /// Descending.
        Descending => "desc",
    }
}

request_parameters! {
    /// Filter for repository listings.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct RepositoryRequest {
        /// Which repositories to include.
        pub repo_type: RepositoryType => "type",
        /// Sort field.
        pub sort: RepositorySort,
        /// Sort direction.
        pub direction: SortDirection,
    }
}

/// Repository to create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewRepository {
    /// Repository name.
    pub name: String,
    /// Repository description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Homepage URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Whether the repository is private.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Whether issues are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    /// Whether wiki is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    /// Auto-initialize with README.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    /// Gitignore template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    /// License template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
}

impl NewRepository {
    /// Creates a request for a repository called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
