//! Response models for the GitHub v3 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub user (minimal representation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Username (login).
    pub login: String,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// User type (User, Organization, Bot).
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,
    /// Site admin flag.
    #[serde(default)]
    pub site_admin: bool,
    /// Profile URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Public email.
    #[serde(default)]
    pub email: Option<String>,
    /// Company.
    #[serde(default)]
    pub company: Option<String>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// Bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Public repos count.
    #[serde(default)]
    pub public_repos: Option<u32>,
    /// Followers count.
    #[serde(default)]
    pub followers: Option<u32>,
    /// Following count.
    #[serde(default)]
    pub following: Option<u32>,
}

/// GitHub repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository ID.
    pub id: u64,
    /// Repository name.
    pub name: String,
    /// Full name (owner/repo).
    pub full_name: String,
    /// Owner information.
    pub owner: User,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Repository description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Clone URL.
    #[serde(default)]
    pub clone_url: Option<String>,
    /// SSH URL.
    #[serde(default)]
    pub ssh_url: Option<String>,
    /// Default branch.
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u32,
    /// Stargazer count.
    #[serde(default)]
    pub stargazers_count: u32,
    /// Open issue count.
    #[serde(default)]
    pub open_issues_count: u32,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// License information.
    #[serde(default)]
    pub license: Option<License>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last push time.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Repository license.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// License key.
    pub key: String,
    /// License name.
    pub name: String,
    /// SPDX ID.
    pub spdx_id: Option<String>,
}

/// GitHub organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub id: u64,
    /// Organization login.
    pub login: String,
    /// Organization name.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Public repos count.
    #[serde(default)]
    pub public_repos: Option<u32>,
}

/// Repository release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Release ID.
    pub id: u64,
    /// Tag name.
    pub tag_name: String,
    /// Target commitish.
    #[serde(default)]
    pub target_commitish: Option<String>,
    /// Release name.
    #[serde(default)]
    pub name: Option<String>,
    /// Release body.
    #[serde(default)]
    pub body: Option<String>,
    /// Whether it's a draft.
    #[serde(default)]
    pub draft: bool,
    /// Whether it's a prerelease.
    #[serde(default)]
    pub prerelease: bool,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Publish time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Author.
    #[serde(default)]
    pub author: Option<User>,
    /// Assets.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Release asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// Asset ID.
    pub id: u64,
    /// File name.
    pub name: String,
    /// Content type.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Download count.
    #[serde(default)]
    pub download_count: u64,
    /// Download URL.
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Public SSH key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    /// Key ID.
    pub id: u64,
    /// Public key.
    pub key: String,
    /// Title (absent on keys listed for other users).
    #[serde(default)]
    pub title: Option<String>,
    /// API URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Notification thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Thread ID.
    pub id: String,
    /// Repository the thread belongs to.
    pub repository: Repository,
    /// Thread subject.
    pub subject: NotificationSubject,
    /// Why the user was notified.
    pub reason: String,
    /// Whether the thread is unread.
    pub unread: bool,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last read time.
    #[serde(default)]
    pub last_read_at: Option<DateTime<Utc>>,
}

/// Subject of a notification thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSubject {
    /// Subject title.
    pub title: String,
    /// API URL of the subject.
    #[serde(default)]
    pub url: Option<String>,
    /// Subject type (Issue, PullRequest, Release, ...).
    #[serde(rename = "type")]
    pub subject_type: String,
}

/// OAuth authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    /// Authorization ID.
    pub id: u64,
    /// Application the authorization belongs to.
    #[serde(default)]
    pub app: Option<AuthorizationApp>,
    /// Token (only returned on creation).
    #[serde(default)]
    pub token: Option<String>,
    /// Last eight characters of the token.
    #[serde(default)]
    pub token_last_eight: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Note.
    #[serde(default)]
    pub note: Option<String>,
    /// Note URL.
    #[serde(default)]
    pub note_url: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Application linked to an authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationApp {
    /// Application name.
    pub name: String,
    /// Application URL.
    #[serde(default)]
    pub url: Option<String>,
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Emoji name and image address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// Emoji name, without colons.
    pub name: String,
    /// Image URL.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_minimal_payload() {
        let repository: Repository = serde_json::from_value(json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": { "id": 1, "login": "octocat", "type": "User" },
            "private": false,
            "created_at": "2011-01-26T19:01:12Z"
        }))
        .unwrap();

        assert_eq!(repository.full_name, "octocat/Hello-World");
        assert_eq!(repository.owner.user_type.as_deref(), Some("User"));
        assert!(repository.created_at.is_some());
        assert!(repository.license.is_none());
    }

    #[test]
    fn test_notification_subject_type() {
        let subject: NotificationSubject = serde_json::from_value(json!({
            "title": "Greetings",
            "url": "https://api.github.com/repos/octocat/Hello-World/issues/1347",
            "type": "Issue"
        }))
        .unwrap();

        assert_eq!(subject.subject_type, "Issue");
    }
}
