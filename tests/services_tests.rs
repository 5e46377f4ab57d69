//! Routing tests for the resource clients over an in-memory connection.

#[cfg(test)]
mod services_tests {
    use integrations_github_sdk::mocks::{MockConnection, MockResponse};
    use integrations_github_sdk::services::{
        AuthorizationUpdate, NewAuthorization, NewRelease, NewSshKey, NotificationsRequest,
        ReleaseUpdate, RepositoryRequest, UserUpdate,
    };
    use integrations_github_sdk::{GitHubClient, GitHubErrorKind};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn setup() -> (Arc<MockConnection>, GitHubClient) {
        let mock = Arc::new(MockConnection::new());
        let client = GitHubClient::from_connection(mock.clone());
        (mock, client)
    }

    fn last_route(mock: &MockConnection) -> String {
        let recorded = mock.last_request().unwrap();
        format!("{} {}", recorded.request.method(), recorded.request.path())
    }

    fn last_body(mock: &MockConnection) -> Value {
        let recorded = mock.last_request().unwrap();
        let body = recorded.request.body().unwrap();
        assert_eq!(body.content_type(), "application/json");
        serde_json::from_slice(body.bytes()).unwrap()
    }

    fn user() -> Value {
        json!({ "id": 1, "login": "octocat" })
    }

    fn repository() -> Value {
        json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": user()
        })
    }

    #[tokio::test]
    async fn test_repositories_routes() {
        let (mock, client) = setup();
        let repos = client.repository();

        mock.on_get("/repos/octocat/Hello-World", MockResponse::ok(&repository()));
        repos.get("octocat", "Hello-World").await.unwrap();

        mock.on_get("/user/repos", MockResponse::ok(&json!([repository()])));
        repos
            .get_all_for_current(&RepositoryRequest::default())
            .await
            .unwrap();
        let recorded = mock.last_request().unwrap();
        assert_eq!(
            recorded.request.parameters().to_query_string().unwrap(),
            "type=all&sort=created&direction=asc"
        );

        mock.on_get("/orgs/github/repos", MockResponse::ok(&json!([])));
        assert!(repos.get_all_for_org("github").await.unwrap().is_empty());

        mock.on_delete("/repos/octocat/Hello-World", MockResponse::no_content());
        repos.delete("octocat", "Hello-World").await.unwrap();
        assert_eq!(last_route(&mock), "DELETE /repos/octocat/Hello-World");
    }

    #[tokio::test]
    async fn test_path_arguments_cannot_reroute_requests() {
        let (mock, client) = setup();

        let error = client
            .repository()
            .get_all_for_user("x/../../orgs/acme", &RepositoryRequest::default())
            .await
            .unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument);

        let error = client.user().get("..").await.unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::InvalidArgument);

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_users_update_patches_profile() {
        let (mock, client) = setup();
        mock.on_patch("/user", MockResponse::ok(&user()));

        client
            .user()
            .update(&UserUpdate {
                bio: Some("Hello".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(last_body(&mock), json!({ "bio": "Hello" }));
    }

    #[tokio::test]
    async fn test_organizations_routes() {
        let (mock, client) = setup();
        let org = json!({ "id": 9919, "login": "github" });

        mock.on_get("/orgs/github", MockResponse::ok(&org));
        mock.on_get("/user/orgs", MockResponse::ok(&json!([org])));

        assert_eq!(client.organization().get("github").await.unwrap().id, 9919);
        assert_eq!(client.organization().get_all_for_current().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_releases_routes() {
        let (mock, client) = setup();
        let release = json!({ "id": 7, "tag_name": "v1.0.0", "draft": true });

        mock.on_post("/repos/octocat/Hello-World/releases", MockResponse::created(&release));
        let created = client
            .release()
            .create(
                "octocat",
                "Hello-World",
                &NewRelease {
                    draft: Some(true),
                    ..NewRelease::new("v1.0.0")
                },
            )
            .await
            .unwrap();
        assert!(created.draft);
        assert_eq!(last_body(&mock), json!({ "tag_name": "v1.0.0", "draft": true }));

        mock.on_patch("/repos/octocat/Hello-World/releases/7", MockResponse::ok(&release));
        client
            .release()
            .update(
                "octocat",
                "Hello-World",
                7,
                &ReleaseUpdate {
                    draft: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(last_body(&mock), json!({ "draft": false }));
    }

    #[tokio::test]
    async fn test_ssh_keys_routes() {
        let (mock, client) = setup();
        let key = json!({ "id": 42, "key": "ssh-rsa AAA", "title": "laptop" });

        mock.on_post("/user/keys", MockResponse::created(&key));
        client
            .ssh_key()
            .create(&NewSshKey {
                title: "laptop".to_string(),
                key: "ssh-rsa AAA".to_string(),
            })
            .await
            .unwrap();

        mock.on_get("/users/octocat/keys", MockResponse::ok(&json!([{ "id": 42, "key": "ssh-rsa AAA" }])));
        let keys = client.ssh_key().get_all("octocat").await.unwrap();
        assert_eq!(keys[0].title, None);
    }

    #[tokio::test]
    async fn test_authorizations_routes() {
        let (mock, client) = setup();
        let authorization = json!({ "id": 1, "scopes": ["repo"], "note": "ci" });

        mock.on_post("/authorizations", MockResponse::created(&authorization));
        client
            .authorization()
            .create(&NewAuthorization {
                scopes: vec!["repo".to_string()],
                note: "ci".to_string(),
                note_url: None,
            })
            .await
            .unwrap();
        assert_eq!(last_body(&mock), json!({ "scopes": ["repo"], "note": "ci" }));

        mock.on_patch("/authorizations/1", MockResponse::ok(&authorization));
        client
            .authorization()
            .update(
                1,
                &AuthorizationUpdate {
                    add_scopes: vec!["gist".to_string()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(last_body(&mock), json!({ "add_scopes": ["gist"] }));
    }

    #[tokio::test]
    async fn test_notifications_request_parameters() {
        let (mock, client) = setup();
        mock.on_get("/repos/octocat/Hello-World/notifications", MockResponse::ok(&json!([])));

        client
            .notification()
            .get_all_for_repository(
                "octocat",
                "Hello-World",
                &NotificationsRequest {
                    all: true,
                    participating: false,
                },
            )
            .await
            .unwrap();

        let recorded = mock.last_request().unwrap();
        assert_eq!(recorded.request.parameters().get("all"), Some("true"));
        assert_eq!(recorded.request.parameters().get("participating"), Some("false"));
    }

    #[tokio::test]
    async fn test_emojis_sorted_by_name() {
        let (mock, client) = setup();
        mock.on_get(
            "/emojis",
            MockResponse::ok(&json!({
                "zap": "https://github.githubassets.com/images/icons/emoji/unicode/26a1.png",
                "+1": "https://github.githubassets.com/images/icons/emoji/unicode/1f44d.png",
                "octocat": "https://github.githubassets.com/images/icons/emoji/octocat.png"
            })),
        );

        let names: Vec<String> = client
            .miscellaneous()
            .get_emojis()
            .await
            .unwrap()
            .into_iter()
            .map(|emoji| emoji.name)
            .collect();

        assert_eq!(names, vec!["+1", "octocat", "zap"]);
    }

    #[tokio::test]
    async fn test_raw_markdown_request() {
        let (mock, client) = setup();
        mock.on_post("/markdown/raw", MockResponse::text("text/html", "<p>hi</p>"));

        let html = client
            .miscellaneous()
            .render_raw_markdown("hi")
            .await
            .unwrap();

        assert_eq!(html, "<p>hi</p>");
        let recorded = mock.last_request().unwrap();
        assert_eq!(recorded.request.accept(), Some("text/html"));
        let body = recorded.request.body().unwrap();
        assert_eq!(body.content_type(), "text/plain");
        assert_eq!(body.as_str(), Some("hi"));
    }

    #[tokio::test]
    async fn test_validation_errors_reach_the_caller() {
        let (mock, client) = setup();
        mock.on_post(
            "/user/keys",
            MockResponse::validation_failed("Validation Failed", &[("key", "custom")]),
        );

        let error = client
            .ssh_key()
            .create(&NewSshKey {
                title: "bad".to_string(),
                key: "not-a-key".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(*error.kind(), GitHubErrorKind::UnprocessableEntity);
        assert_eq!(error.message(), "Validation Failed (key: custom)");
    }
}
