//! Integration tests for the client facade.

#[cfg(test)]
mod client_tests {
    use async_trait::async_trait;
    use integrations_github_sdk::connection::Connection;
    use integrations_github_sdk::mocks::{MockConnection, MockResponse};
    use integrations_github_sdk::{
        CredentialStore, Credentials, GitHubClient, GitHubErrorKind, GitHubResult,
        InMemoryCredentialStore,
    };
    use mockall::mock;
    use std::sync::Arc;
    use url::Url;

    mock! {
        pub Store {}

        #[async_trait]
        impl CredentialStore for Store {
            async fn get_credentials(&self) -> GitHubResult<Credentials>;
        }
    }

    fn enterprise() -> Url {
        Url::parse("https://ghe.example.com/api/v3").unwrap()
    }

    fn store(credentials: Credentials) -> Arc<dyn CredentialStore> {
        Arc::new(InMemoryCredentialStore::new(credentials))
    }

    /// Every resource client's connection, in facade accessor order.
    fn sub_client_connections(client: &GitHubClient) -> Vec<&Arc<dyn Connection>> {
        vec![
            client.authorization().connection(),
            client.miscellaneous().connection(),
            client.notification().connection(),
            client.organization().connection(),
            client.repository().connection(),
            client.release().connection(),
            client.ssh_key().connection(),
            client.user().connection(),
        ]
    }

    fn all_construction_paths() -> Vec<GitHubClient> {
        let token = Credentials::token("abc");
        vec![
            GitHubClient::new("octo-test").unwrap(),
            GitHubClient::with_credential_store("octo-test", store(token.clone())).unwrap(),
            GitHubClient::with_base_address("octo-test", enterprise()).unwrap(),
            GitHubClient::with_credential_store_and_base_address(
                "octo-test",
                store(token),
                enterprise(),
            )
            .unwrap(),
            GitHubClient::from_connection(Arc::new(MockConnection::new())),
        ]
    }

    #[test]
    fn test_every_sub_client_shares_the_facade_connection() {
        for client in all_construction_paths() {
            for connection in sub_client_connections(&client) {
                assert!(Arc::ptr_eq(connection, client.connection()));
            }
        }
    }

    #[tokio::test]
    async fn test_credentials_change_is_seen_by_every_sub_client() {
        for client in all_construction_paths() {
            let credentials = Credentials::basic("octocat", "secret");
            client.set_credentials(credentials.clone()).unwrap();

            assert_eq!(client.credentials().await.unwrap(), credentials);
            for connection in sub_client_connections(&client) {
                assert_eq!(connection.credentials().await.unwrap(), credentials);
            }
        }
    }

    #[tokio::test]
    async fn test_default_credentials_are_anonymous() {
        let client = GitHubClient::new("octo-test").unwrap();
        assert_eq!(client.credentials().await.unwrap(), Credentials::Anonymous);
    }

    #[tokio::test]
    async fn test_supplied_credential_store_is_consulted() {
        let mut store = MockStore::new();
        store
            .expect_get_credentials()
            .times(1)
            .returning(|| Ok(Credentials::token("from-store")));

        let client = GitHubClient::with_credential_store("octo-test", Arc::new(store)).unwrap();

        assert_eq!(
            client.credentials().await.unwrap(),
            Credentials::token("from-store")
        );
    }

    #[tokio::test]
    async fn test_setting_credentials_replaces_supplied_store() {
        let mut store = MockStore::new();
        store.expect_get_credentials().never();

        let client = GitHubClient::with_credential_store("octo-test", Arc::new(store)).unwrap();
        client.set_credentials(Credentials::token("replacement")).unwrap();

        assert_eq!(
            client.credentials().await.unwrap(),
            Credentials::token("replacement")
        );
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_and_previous_kept() {
        let client = GitHubClient::new("octo-test").unwrap();
        client.set_credentials(Credentials::token("first")).unwrap();

        for invalid in [
            Credentials::token(""),
            Credentials::basic("", "secret"),
            Credentials::basic("octocat", ""),
        ] {
            let error = client.set_credentials(invalid).unwrap_err();
            assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument);
        }

        assert_eq!(client.credentials().await.unwrap(), Credentials::token("first"));
    }

    #[tokio::test]
    async fn test_last_credentials_write_wins() {
        let client = GitHubClient::new("octo-test").unwrap();
        client.set_credentials(Credentials::token("one")).unwrap();
        client.set_credentials(Credentials::basic("octocat", "two")).unwrap();
        client.set_credentials(Credentials::Anonymous).unwrap();

        assert_eq!(client.credentials().await.unwrap(), Credentials::Anonymous);
    }

    #[test]
    fn test_default_base_address() {
        let client = GitHubClient::new("octo-test").unwrap();
        assert_eq!(client.base_address().as_str(), "https://api.github.com/");
    }

    #[test]
    fn test_enterprise_base_address_is_normalized() {
        let client = GitHubClient::with_base_address("octo-test", enterprise()).unwrap();
        assert_eq!(
            client.base_address().as_str(),
            "https://ghe.example.com/api/v3/"
        );
    }

    #[test]
    fn test_base_address_unchanged_by_credentials() {
        let client = GitHubClient::with_base_address("octo-test", enterprise()).unwrap();
        let before = client.base_address().clone();
        client.set_credentials(Credentials::token("abc")).unwrap();
        assert_eq!(client.base_address(), &before);
    }

    #[test]
    fn test_non_http_base_address_rejected() {
        let error = GitHubClient::with_base_address(
            "octo-test",
            Url::parse("ftp://example.com/").unwrap(),
        )
        .err()
        .unwrap();
        assert_eq!(*error.kind(), GitHubErrorKind::InvalidBaseUrl);
    }

    #[test]
    fn test_builder_without_connection_or_user_agent_fails() {
        let error = GitHubClient::builder()
            .base_address(enterprise())
            .build()
            .err()
            .unwrap();
        assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument);
    }

    #[test]
    fn test_builder_wraps_supplied_connection() {
        let connection: Arc<dyn Connection> =
            Arc::new(MockConnection::new().with_base_address(enterprise()));

        let client = GitHubClient::builder()
            .connection(connection.clone())
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(client.connection(), &connection));
        assert_eq!(client.base_address(), &enterprise());
    }

    #[tokio::test]
    async fn test_requests_carry_current_credentials() {
        let mock = Arc::new(MockConnection::new());
        mock.on_get("/user", MockResponse::ok(&serde_json::json!({ "id": 1, "login": "octocat" })));
        mock.on_get("/user", MockResponse::ok(&serde_json::json!({ "id": 1, "login": "octocat" })));

        let client = GitHubClient::from_connection(mock.clone());
        client.user().current().await.unwrap();
        client.set_credentials(Credentials::token("abc")).unwrap();
        client.user().current().await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].credentials, Credentials::Anonymous);
        assert_eq!(requests[1].credentials, Credentials::token("abc"));
    }
}
