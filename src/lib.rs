//! # GitHub SDK
//!
//! A typed client facade for the GitHub v3 REST API:
//! - One [`GitHubClient`] owns one connection shared by every resource client
//! - Pluggable credential stores (in-memory, environment, or your own)
//! - Declarative query parameters with per-member wire overrides
//! - Structured `tracing` events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_github_sdk::services::RepositoryRequest;
//! use integrations_github_sdk::{Credentials, GitHubClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::new("my-app/1.0")?;
//!     client.set_credentials(Credentials::token("ghp_xxxxxxxxxxxx"))?;
//!
//!     let repos = client
//!         .repository()
//!         .get_all_for_user("octocat", &RepositoryRequest::default())
//!         .await?;
//!     for repo in repos {
//!         println!("{}", repo.full_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// Authentication
pub mod auth;

// Query parameters
pub mod parameters;

// Transport
pub mod connection;

// Facade
pub mod client;

// API Services
pub mod services;

// Observability
pub mod observability;

// Mocks for testing
pub mod mocks;

// Re-exports for convenience
pub use auth::{
    AuthenticationType, CredentialStore, Credentials, EnvironmentCredentialStore,
    InMemoryCredentialStore,
};
pub use client::{GitHubClient, GitHubClientBuilder};
pub use config::{GitHubConfig, GitHubConfigBuilder};
pub use connection::{ApiRequest, ApiResponse, Connection, HttpConnection};
pub use errors::{GitHubError, GitHubErrorKind, GitHubResult};
pub use parameters::{ParameterEnum, Parameters, RequestParameters};
pub use types::*;
