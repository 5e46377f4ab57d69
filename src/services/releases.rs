//! Release operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::types::Release;
use serde::Serialize;
use std::sync::Arc;

/// Client for repository releases.
#[derive(Clone)]
pub struct ReleasesClient {
    api: ApiConnection,
}

impl ReleasesClient {
    /// Creates a new releases client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Lists releases.
    pub async fn get_all(&self, owner: &str, name: &str) -> GitHubResult<Vec<Release>> {
        self.api
            .get(&api_path(&["repos", owner, name, "releases"])?)
            .await
    }

    /// Gets a release.
    pub async fn get(&self, owner: &str, name: &str, release_id: u64) -> GitHubResult<Release> {
        self.api
            .get(&api_path(&["repos", owner, name, "releases", &release_id.to_string()])?)
            .await
    }

    /// Creates a release.
    pub async fn create(
        &self,
        owner: &str,
        name: &str,
        release: &NewRelease,
    ) -> GitHubResult<Release> {
        self.api
            .post(&api_path(&["repos", owner, name, "releases"])?, release)
            .await
    }

    /// Edits a release.
    pub async fn update(
        &self,
        owner: &str,
        name: &str,
        release_id: u64,
        update: &ReleaseUpdate,
    ) -> GitHubResult<Release> {
        self.api
            .patch(
                &api_path(&["repos", owner, name, "releases", &release_id.to_string()])?,
                update,
            )
            .await
    }

    /// Deletes a release.
    pub async fn delete(&self, owner: &str, name: &str, release_id: u64) -> GitHubResult<()> {
        self.api
            .delete(&api_path(&["repos", owner, name, "releases", &release_id.to_string()])?)
            .await
    }
}

/// Release to create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewRelease {
    /// Tag name.
    pub tag_name: String,
    /// Target commitish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    /// Release name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether it's a draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Whether it's a prerelease.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

impl NewRelease {
    /// Creates a release request for `tag_name`.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }
}

/// Changes to an existing release.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReleaseUpdate {
    /// Tag name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Target commitish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
    /// Release name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether it's a draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Whether it's a prerelease.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}
