//! Lists a user's repositories through the client facade.
//!
//! Run with:
//! ```
//! GITHUB_TOKEN=ghp_xxxxxxxxxxxx cargo run --example list_repositories -- octocat
//! ```
//!
//! Without `GITHUB_TOKEN` the requests are anonymous and subject to the
//! unauthenticated rate limit.

use anyhow::Context;
use integrations_github_sdk::services::{
    RepositoryRequest, RepositorySort, RepositoryType, SortDirection,
};
use integrations_github_sdk::{EnvironmentCredentialStore, GitHubClient, RequestParameters};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let login = std::env::args().nth(1).unwrap_or_else(|| "octocat".to_string());

    let client = GitHubClient::with_credential_store(
        "integrations-github-sdk-demo/0.1",
        Arc::new(EnvironmentCredentialStore::from_github_token()),
    )?;

    let credentials = client.credentials().await?;
    println!(
        "Connecting to {} as {}",
        client.base_address(),
        credentials.authentication_type()
    );

    let request = RepositoryRequest {
        repo_type: RepositoryType::Owner,
        sort: RepositorySort::FullName,
        direction: SortDirection::Ascending,
    };
    println!("Query: {}", request.to_parameters()?.to_query_string()?);

    let repos = client
        .repository()
        .get_all_for_user(&login, &request)
        .await
        .with_context(|| format!("listing repositories for {}", login))?;

    for repo in &repos {
        println!(
            "{:<40} {:>6} stars  {}",
            repo.full_name,
            repo.stargazers_count,
            repo.description.as_deref().unwrap_or("")
        );
    }
    println!("{} repositories", repos.len());

    let emojis = client.miscellaneous().get_emojis().await?;
    println!("{} emojis available", emojis.len());

    Ok(())
}
