//! Tests for assignee operations.

use futures::StreamExt;
use serde_json::json;

use super::support::{MockTransport, client, empty, fast_settings, json};
use ghcmd::{GitHubError, RepositoryRef, ResourceKind};

fn repo() -> RepositoryRef {
    RepositoryRef::new("octo", "hello").unwrap()
}

#[tokio::test]
async fn test_list_assignees_decorated() {
    let transport = MockTransport::routed(vec![(
        "https://api.github.com/repos/octo/hello/assignees",
        json(200, &json!([{"login": "octocat", "id": 1}, {"login": "hubot", "id": 2}])),
    )]);
    let gh = client(transport.clone(), fast_settings());

    let mut stream = gh.list_assignees(repo());
    let mut users = Vec::new();
    while let Some(user) = stream.next().await {
        users.push(user.unwrap());
    }

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].login, "octocat");
    assert_eq!(users[1].kind(), ResourceKind::User);
    assert_eq!(users[1].repository_url(), Some("https://github.com/octo/hello"));
    assert_eq!(
        transport.api_requests()[0].header("Authorization"),
        Some("token test-token")
    );
}

#[tokio::test]
async fn test_assignee_check_maps_statuses() {
    let transport = MockTransport::routed(vec![
        ("https://api.github.com/repos/octo/hello/assignees/octocat", empty(204)),
        (
            "https://api.github.com/repos/octo/hello/assignees/nobody",
            json(404, &json!({"message": "Not Found"})),
        ),
        (
            "https://api.github.com/repos/octo/hello/assignees/broken",
            json(500, &json!({"message": "Server Error"})),
        ),
    ]);
    let gh = client(transport, fast_settings());

    assert!(gh.test_assignee(repo(), "octocat").await.unwrap().unwrap());
    assert!(!gh.test_assignee(repo(), "nobody").await.unwrap().unwrap());

    let err = gh.test_assignee(repo(), "broken").await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_add_assignees_posts_logins() {
    let transport = MockTransport::scripted(vec![json(
        201,
        &json!({
            "number": 12,
            "title": "Crash on start",
            "assignees": [{"login": "octocat", "id": 1}]
        }),
    )]);
    let gh = client(transport.clone(), fast_settings());

    let issue = gh
        .add_assignees(repo(), 12, vec!["octocat".into()])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(issue.number, 12);
    assert_eq!(issue.assignees[0].login, "octocat");
    assert_eq!(issue.type_name(), "GitHub.Issue");

    let sent = &transport.api_requests()[0];
    assert_eq!(sent.method.as_str(), "POST");
    assert_eq!(sent.url, "https://api.github.com/repos/octo/hello/issues/12/assignees");
    let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
    assert_eq!(body, json!({"assignees": ["octocat"]}));
}

#[tokio::test]
async fn test_remove_assignees_uses_delete() {
    let transport =
        MockTransport::scripted(vec![json(200, &json!({"number": 12, "assignees": []}))]);
    let gh = client(transport.clone(), fast_settings());

    let issue = gh
        .remove_assignees(repo(), 12, vec!["octocat".into(), "hubot".into()])
        .await
        .unwrap()
        .unwrap();

    assert!(issue.assignees.is_empty());
    let sent = &transport.api_requests()[0];
    assert_eq!(sent.method.as_str(), "DELETE");
    assert!(sent.body.is_some());
}

#[tokio::test]
async fn test_empty_login_list_rejected_without_request() {
    let transport = MockTransport::scripted(vec![]);
    let gh = client(transport.clone(), fast_settings());

    let err = gh.add_assignees(repo(), 1, Vec::new()).await.unwrap().unwrap_err();

    assert!(matches!(err, GitHubError::InvalidInput(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_blank_login_among_others_rejected_without_request() {
    let transport = MockTransport::scripted(vec![]);
    let gh = client(transport.clone(), fast_settings());

    let err = gh
        .remove_assignees(repo(), 1, vec!["octocat".into(), "  ".into()])
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, GitHubError::InvalidInput(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_repository_from_configured_defaults() {
    let transport = MockTransport::scripted(vec![]);
    let settings = ghcmd::Settings {
        default_owner_name: "octo".into(),
        default_repository_name: "hello".into(),
        ..fast_settings()
    };
    let gh = client(transport, settings);

    assert_eq!(gh.repository(None, None, None).unwrap(), repo());
    assert_eq!(
        gh.repository(Some("https://github.com/octo/hello"), None, None).unwrap(),
        repo()
    );
}
