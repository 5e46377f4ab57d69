//! Public SSH key operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::types::SshKey;
use serde::Serialize;
use std::sync::Arc;

/// Client for public SSH keys.
#[derive(Clone)]
pub struct SshKeysClient {
    api: ApiConnection,
}

impl SshKeysClient {
    /// Creates a new SSH keys client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Gets a key of the authenticated user.
    pub async fn get(&self, key_id: u64) -> GitHubResult<SshKey> {
        self.api.get(&api_path(&["user", "keys", &key_id.to_string()])?).await
    }

    /// Lists the public keys of a user.
    pub async fn get_all(&self, login: &str) -> GitHubResult<Vec<SshKey>> {
        self.api.get(&api_path(&["users", login, "keys"])?).await
    }

    /// Lists the keys of the authenticated user.
    pub async fn get_all_for_current(&self) -> GitHubResult<Vec<SshKey>> {
        self.api.get("/user/keys").await
    }

    /// Adds a key to the authenticated user.
    pub async fn create(&self, key: &NewSshKey) -> GitHubResult<SshKey> {
        self.api.post("/user/keys", key).await
    }

    /// Removes a key from the authenticated user.
    pub async fn delete(&self, key_id: u64) -> GitHubResult<()> {
        self.api.delete(&api_path(&["user", "keys", &key_id.to_string()])?).await
    }
}

/// Key to add.
#[derive(Debug, Clone, Serialize)]
pub struct NewSshKey {
    /// Key title.
    pub title: String,
    /// Public key.
    pub key: String,
}
