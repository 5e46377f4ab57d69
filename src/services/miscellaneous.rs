//! Endpoints that belong to no resource.

use crate::connection::{ApiRequest, Connection};
use crate::errors::GitHubResult;
use crate::types::Emoji;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Client for emojis and markdown rendering.
///
/// Talks to the raw connection because markdown rendering is not JSON.
#[derive(Clone)]
pub struct MiscellaneousClient {
    connection: Arc<dyn Connection>,
}

impl MiscellaneousClient {
    /// Creates a new miscellaneous client.
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    /// Gets the shared connection.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Lists the emojis available on the server, ordered by name.
    pub async fn get_emojis(&self) -> GitHubResult<Vec<Emoji>> {
        let emojis: BTreeMap<String, String> =
            self.connection.send(ApiRequest::get("/emojis")).await?.json()?;
        Ok(emojis
            .into_iter()
            .map(|(name, url)| Emoji { name, url })
            .collect())
    }

    /// Renders markdown to HTML without repository context.
    pub async fn render_raw_markdown(&self, markdown: &str) -> GitHubResult<String> {
        let request = ApiRequest::post("/markdown/raw")
            .with_text("text/plain", markdown)
            .with_accept("text/html");
        self.connection.send(request).await?.text()
    }
}
