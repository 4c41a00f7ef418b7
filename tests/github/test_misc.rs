//! Tests for rate limit, markdown, licenses, codes of conduct, gitignore and emojis.

use futures::StreamExt;
use serde_json::{Value, json};
use std::time::Duration;

use super::support::{MockTransport, TELEMETRY_URL, client, empty, fast_settings, json, response};
use ghcmd::github::{CODES_OF_CONDUCT_ACCEPT, RAW_ACCEPT};
use ghcmd::{MarkdownMode, RepositoryRef, Settings};

const API: &str = "https://api.github.com";

#[tokio::test]
async fn test_rate_limit() {
    let transport = MockTransport::routed(vec![(
        "https://api.github.com/rate_limit",
        json(
            200,
            &json!({
                "resources": {
                    "core": {"limit": 5000, "remaining": 4990, "reset": 1_700_000_000},
                    "search": {"limit": 30, "remaining": 30, "reset": 1_700_000_060},
                    "graphql": {"limit": 5000, "remaining": 5000, "reset": 1_700_000_000}
                },
                "rate": {"limit": 5000, "remaining": 4990, "reset": 1_700_000_000}
            }),
        ),
    )]);
    let gh = client(transport, fast_settings());

    let limits = gh.get_rate_limit().await.unwrap().unwrap();

    assert_eq!(limits.type_name(), "GitHub.RateLimit");
    assert_eq!(limits.resources.core.remaining, 4990);
    assert_eq!(limits.resources.graphql.unwrap().limit, 5000);
    assert_eq!(
        limits.resources.core.reset_at().unwrap().timestamp(),
        1_700_000_000
    );
}

#[tokio::test]
async fn test_render_markdown_returns_html() {
    let transport = MockTransport::scripted(vec![response(
        200,
        "<p><strong>hi</strong> <a href=\"#\">#1</a></p>\n",
        &[("Content-Type", "text/html;charset=utf-8")],
    )]);
    let gh = client(transport.clone(), fast_settings());
    let context = RepositoryRef::new("octo", "hello").unwrap();

    let html = gh
        .render_markdown("**hi** #1", MarkdownMode::Gfm, Some(context))
        .await
        .unwrap()
        .unwrap();

    assert!(html.starts_with("<p><strong>hi</strong>"));
    let sent = &transport.api_requests()[0];
    assert_eq!(sent.url, format!("{API}/markdown"));
    assert_eq!(sent.header("Accept"), Some("text/html"));
    let body: Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
    assert_eq!(body, json!({"text": "**hi** #1", "mode": "gfm", "context": "octo/hello"}));
}

#[tokio::test]
async fn test_licenses() {
    let transport = MockTransport::routed(vec![
        (
            "https://api.github.com/licenses",
            json(
                200,
                &json!([
                    {"key": "mit", "name": "MIT License", "spdx_id": "MIT"},
                    {"key": "apache-2.0", "name": "Apache License 2.0", "spdx_id": "Apache-2.0"}
                ]),
            ),
        ),
        (
            "https://api.github.com/licenses/mit",
            json(
                200,
                &json!({"key": "mit", "name": "MIT License", "body": "Permission is hereby granted",
                        "permissions": ["commercial-use"]}),
            ),
        ),
        (
            "https://api.github.com/repos/octo/hello/license",
            json(
                200,
                &json!({"name": "LICENSE", "path": "LICENSE", "encoding": "base64",
                        "content": "TUlUIExpY2Vuc2U=\n",
                        "license": {"key": "mit", "name": "MIT License"}}),
            ),
        ),
    ]);
    let gh = client(transport, fast_settings());

    let keys: Vec<String> = gh
        .list_licenses()
        .map(|l| l.unwrap().key.clone())
        .collect()
        .await;
    assert_eq!(keys, vec!["mit", "apache-2.0"]);

    let mit = gh.get_license("mit").await.unwrap().unwrap();
    assert_eq!(mit.type_name(), "GitHub.License");
    assert_eq!(mit.permissions, vec!["commercial-use"]);
    assert!(mit.repository_url().is_none());

    let repo = RepositoryRef::new("octo", "hello").unwrap();
    let file = gh.get_repository_license(repo).await.unwrap().unwrap();
    assert_eq!(file.decoded_content().unwrap(), "MIT License");
    assert_eq!(file.repository_url(), Some("https://github.com/octo/hello"));
}

#[tokio::test]
async fn test_codes_of_conduct_use_preview_media_type() {
    let conduct = json!({"key": "contributor_covenant", "name": "Contributor Covenant"});
    let transport = MockTransport::routed(vec![
        ("https://api.github.com/codes_of_conduct", json(200, &json!([conduct.clone()]))),
        (
            "https://api.github.com/codes_of_conduct/contributor_covenant",
            json(200, &conduct),
        ),
        (
            "https://api.github.com/repos/octo/hello/community/code_of_conduct",
            json(200, &conduct),
        ),
    ]);
    let gh = client(transport.clone(), fast_settings());

    let all: Vec<_> = gh.list_codes_of_conduct().collect().await;
    assert_eq!(all.len(), 1);
    let one = gh.get_code_of_conduct("contributor_covenant").await.unwrap().unwrap();
    assert_eq!(one.name, "Contributor Covenant");
    let repo = RepositoryRef::new("octo", "hello").unwrap();
    let adopted = gh.get_repository_code_of_conduct(repo).await.unwrap().unwrap();
    assert_eq!(adopted.type_name(), "GitHub.CodeOfConduct");

    let requests = transport.api_requests();
    assert_eq!(requests.len(), 3);
    assert!(
        requests
            .iter()
            .all(|r| r.header("Accept") == Some(CODES_OF_CONDUCT_ACCEPT))
    );
}

#[tokio::test]
async fn test_gitignore_templates() {
    let transport = MockTransport::routed(vec![
        (
            "https://api.github.com/gitignore/templates",
            json(200, &json!(["C", "C++", "Rust"])),
        ),
        (
            "https://api.github.com/gitignore/templates/C%2B%2B",
            json(200, &json!({"name": "C++", "source": "*.o\n"})),
        ),
    ]);
    let gh = client(transport.clone(), fast_settings());

    let names: Vec<String> = gh
        .list_gitignore_templates()
        .map(Result::unwrap)
        .collect()
        .await;
    assert_eq!(names, vec!["C", "C++", "Rust"]);

    let template = gh.get_gitignore_template("C++").await.unwrap().unwrap();
    assert_eq!(template.source, "*.o\n");
    assert_eq!(template.type_name(), "GitHub.Gitignore");
}

#[tokio::test]
async fn test_gitignore_template_raw() {
    let transport = MockTransport::scripted(vec![response(
        200,
        "/target\nCargo.lock\n",
        &[("Content-Type", "application/vnd.github.v3.raw")],
    )]);
    let gh = client(transport.clone(), fast_settings());

    let source = gh.get_gitignore_template_raw("Rust").await.unwrap().unwrap();

    assert_eq!(source, "/target\nCargo.lock\n");
    assert_eq!(transport.api_requests()[0].header("Accept"), Some(RAW_ACCEPT));
}

#[tokio::test]
async fn test_emojis() {
    let transport = MockTransport::scripted(vec![json(
        200,
        &json!({"+1": "https://github.githubassets.com/images/icons/emoji/unicode/1f44d.png",
                "octocat": "https://github.githubassets.com/images/icons/emoji/octocat.png"}),
    )]);
    let gh = client(transport, fast_settings());

    let emojis = gh.list_emojis().await.unwrap().unwrap();

    assert_eq!(emojis.len(), 2);
    assert!(emojis["octocat"].ends_with("octocat.png"));
}

#[tokio::test]
async fn test_telemetry_sent_with_hashed_repository() {
    let transport = MockTransport::routed(vec![
        ("https://api.github.com/repos/octo/hello/assignees/octocat", empty(204)),
        (TELEMETRY_URL, empty(200)),
    ]);
    let settings = Settings {
        application_insights_key: "00000000-0000-0000-0000-000000000000".into(),
        suppress_telemetry_reminder: true,
        ..fast_settings()
    };
    let gh = client(transport.clone(), settings);

    let repo = RepositoryRef::new("octo", "hello").unwrap();
    assert!(gh.test_assignee(repo, "octocat").await.unwrap().unwrap());

    // Delivery is detached from the call; give it a moment.
    for _ in 0..50 {
        if transport.requests().len() > 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let telemetry: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.url == TELEMETRY_URL)
        .collect();
    assert_eq!(telemetry.len(), 1);
    let envelopes: Value = serde_json::from_slice(telemetry[0].body.as_ref().unwrap()).unwrap();
    let data = &envelopes[0]["data"]["baseData"];
    assert_eq!(data["name"], "TestAssignee");
    assert_eq!(data["properties"]["OwnerName"].as_str().unwrap().len(), 128);
    assert_ne!(data["properties"]["OwnerName"], "octo");
}

#[tokio::test]
async fn test_telemetry_disabled_sends_nothing() {
    let transport = MockTransport::routed(vec![
        ("https://api.github.com/emojis", json(200, &json!({}))),
        (TELEMETRY_URL, empty(200)),
    ]);
    let settings = Settings {
        application_insights_key: "key".into(),
        disable_telemetry: true,
        ..fast_settings()
    };
    let gh = client(transport.clone(), settings);

    gh.list_emojis().await.unwrap().unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(transport.requests().len(), 1);
}
