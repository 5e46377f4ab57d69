//! Notification operations.

use crate::connection::{api_path, ApiConnection, Connection};
use crate::errors::GitHubResult;
use crate::request_parameters;
use crate::types::Notification;
use std::sync::Arc;

/// Client for notification threads.
#[derive(Clone)]
pub struct NotificationsClient {
    api: ApiConnection,
}

impl NotificationsClient {
    /// Creates a new notifications client.
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        self.api.connection()
    }

    /// Lists notifications for the authenticated user.
    pub async fn get_all_for_current(
        &self,
        request: &NotificationsRequest,
    ) -> GitHubResult<Vec<Notification>> {
        self.api.get_with_parameters("/notifications", request).await
    }

    /// Lists notifications for the authenticated user in one repository.
    pub async fn get_all_for_repository(
        &self,
        owner: &str,
        name: &str,
        request: &NotificationsRequest,
    ) -> GitHubResult<Vec<Notification>> {
        self.api
            .get_with_parameters(&api_path(&["repos", owner, name, "notifications"])?, request)
            .await
    }

    /// Marks every notification of the authenticated user as read.
    pub async fn mark_as_read(&self) -> GitHubResult<()> {
        self.api.put_no_content("/notifications").await
    }
}

request_parameters! {
    /// Filter for notification listings.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct NotificationsRequest {
        /// Include threads already marked as read.
        pub all: bool,
        /// Only threads the user participates in or is mentioned in.
        pub participating: bool,
    }
}
