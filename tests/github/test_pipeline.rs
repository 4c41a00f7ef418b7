//! Tests for the single-exchange pipeline and the retry-until-ready loop.

use serde_json::json;
use std::time::Duration;

use super::support::{MockTransport, empty, fast_settings, json, pipeline};
use ghcmd::github::pipeline::JSON_CONTENT_TYPE;
use ghcmd::{GitHubError, RequestDescriptor, ResponseBody, Settings};
use secrecy::SecretString;

#[tokio::test]
async fn test_not_ready_is_retried_until_ready() {
    let transport = MockTransport::scripted(vec![
        empty(202),
        empty(202),
        json(200, &json!({"total": 3})),
    ]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    let descriptor = RequestDescriptor::get("repos/o/r/stats/contributors").max_retries(5);
    let result = pipeline.execute(&descriptor).await.unwrap();

    assert_eq!(result.status, 200);
    assert_eq!(result.body, ResponseBody::Json(json!({"total": 3})));
    assert_eq!(transport.api_requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_waits_between_attempts() {
    let transport = MockTransport::scripted(vec![empty(202), empty(202), json(200, &json!([]))]);
    let pipeline = pipeline(transport.clone(), Settings::default());

    let started = tokio::time::Instant::now();
    let descriptor = RequestDescriptor::get("repos/o/r/stats/commit_activity");
    pipeline.execute(&descriptor).await.unwrap();

    // Two waits of the default 30 seconds.
    assert!(started.elapsed() >= Duration::from_secs(60));
    assert_eq!(transport.api_requests().len(), 3);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let transport = MockTransport::scripted(vec![empty(202); 5]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    let descriptor = RequestDescriptor::get("repos/o/r/stats/contributors").max_retries(2);
    let err = pipeline.execute(&descriptor).await.unwrap_err();

    match &err {
        GitHubError::RetryExhausted { attempts, descriptor } => {
            assert_eq!(*attempts, 3);
            assert_eq!(descriptor.uri_fragment, "repos/o/r/stats/contributors");
        }
        other => panic!("expected RetryExhausted, got {other:?}"),
    }
    assert!(err.to_string().contains("retries exhausted"));
    assert_eq!(transport.api_requests().len(), 3);
}

#[tokio::test]
async fn test_zero_retries_fails_on_first_not_ready() {
    let transport = MockTransport::scripted(vec![empty(202), json(200, &json!({}))]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    let descriptor = RequestDescriptor::get("repos/o/r/stats/punch_card").max_retries(0);
    let err = pipeline.execute(&descriptor).await.unwrap_err();

    assert!(matches!(err, GitHubError::RetryExhausted { attempts: 1, .. }));
    assert_eq!(transport.api_requests().len(), 1);
}

#[tokio::test]
async fn test_mutating_request_is_not_resent_on_accepted() {
    let transport = MockTransport::scripted(vec![json(202, &json!({"full_name": "me/r"}))]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    let descriptor = RequestDescriptor::post("repos/o/r/forks");
    let result = pipeline.execute(&descriptor).await.unwrap();

    assert_eq!(result.status, 202);
    assert_eq!(transport.api_requests().len(), 1);
}

#[tokio::test]
async fn test_not_found_is_structured() {
    let transport = MockTransport::scripted(vec![json(
        404,
        &json!({"message": "Not Found", "documentation_url": "https://docs.github.com/rest"}),
    )]);
    let pipeline = pipeline(transport, fast_settings());

    let err = pipeline
        .execute(&RequestDescriptor::get("repos/o/missing"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Not Found"), "{err}");
    let GitHubError::Api(api) = err else {
        panic!("expected an API error");
    };
    assert_eq!(api.message, "Not Found");
    assert_eq!(api.documentation_url.as_deref(), Some("https://docs.github.com/rest"));
    assert_eq!(api.descriptor.uri_fragment, "repos/o/missing");
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    let transport = MockTransport::scripted(vec![]);
    let pipeline = pipeline(transport, fast_settings());

    let err = pipeline
        .execute(&RequestDescriptor::get("rate_limit"))
        .await
        .unwrap_err();

    assert!(matches!(&err, GitHubError::Api(api) if api.status.is_none()));
}

#[tokio::test]
async fn test_body_and_content_type_for_mutating_calls() {
    let transport = MockTransport::scripted(vec![json(201, &json!({"number": 7}))]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    let descriptor = RequestDescriptor::post("repos/o/r/issues/7/assignees")
        .json_body(&json!({"assignees": ["octocat"]}))
        .unwrap();
    pipeline.execute(&descriptor).await.unwrap();

    let sent = &transport.api_requests()[0];
    assert_eq!(sent.method.as_str(), "POST");
    assert_eq!(sent.header("Content-Type"), Some(JSON_CONTENT_TYPE));
    let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
    assert_eq!(body, json!({"assignees": ["octocat"]}));
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let transport = MockTransport::scripted(vec![json(200, &json!({}))]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    pipeline.execute(&RequestDescriptor::get("emojis")).await.unwrap();

    let sent = &transport.api_requests()[0];
    assert!(sent.header("Authorization").is_none());
    assert!(sent.header("User-Agent").is_some());
    assert_eq!(sent.header("Accept"), Some("application/vnd.github.v3+json"));
    assert!(sent.header("Content-Type").is_none());
}

#[tokio::test]
async fn test_explicit_token_is_sent() {
    let transport = MockTransport::scripted(vec![json(200, &json!({}))]);
    let pipeline = pipeline(transport.clone(), fast_settings())
        .with_access_token(SecretString::from("abc123".to_string()));

    pipeline.execute(&RequestDescriptor::get("emojis")).await.unwrap();

    assert_eq!(
        transport.api_requests()[0].header("Authorization"),
        Some("token abc123")
    );
}

#[tokio::test]
async fn test_enterprise_host_url() {
    let transport = MockTransport::scripted(vec![json(200, &json!({}))]);
    let settings = Settings {
        api_host_name: "ghe.example.com".into(),
        ..fast_settings()
    };
    let pipeline = pipeline(transport.clone(), settings);

    pipeline
        .execute(&RequestDescriptor::get("/repos/o/r/assignees"))
        .await
        .unwrap();

    assert_eq!(
        transport.api_requests()[0].url,
        "https://ghe.example.com/api/v3/repos/o/r/assignees"
    );
}

#[tokio::test]
async fn test_timeout_setting_applied() {
    let transport = MockTransport::scripted(vec![json(200, &json!({})), json(200, &json!({}))]);
    let settings = Settings {
        web_request_timeout_sec: 12,
        ..fast_settings()
    };
    let pipeline = pipeline(transport.clone(), settings);
    pipeline.execute(&RequestDescriptor::get("emojis")).await.unwrap();
    assert_eq!(transport.api_requests()[0].timeout, Some(Duration::from_secs(12)));

    let untimed = super::support::pipeline(transport.clone(), fast_settings());
    untimed.execute(&RequestDescriptor::get("emojis")).await.unwrap();
    assert_eq!(transport.api_requests()[1].timeout, None);
}

#[tokio::test]
async fn test_repeated_execute_is_idempotent() {
    let transport = MockTransport::routed(vec![(
        "https://api.github.com/licenses/mit",
        json(200, &json!({"key": "mit", "name": "MIT License"})),
    )]);
    let pipeline = pipeline(transport.clone(), fast_settings());
    let descriptor = RequestDescriptor::get("licenses/mit");

    let first = pipeline.execute(&descriptor).await.unwrap();
    let second = pipeline.execute(&descriptor).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.api_requests().len(), 2);
}

#[tokio::test]
async fn test_get_with_body_is_rejected_before_sending() {
    let transport = MockTransport::scripted(vec![]);
    let pipeline = pipeline(transport.clone(), fast_settings());

    let err = RequestDescriptor::get("emojis").json_body(&json!({})).unwrap_err();
    assert!(matches!(err, GitHubError::InvalidInput(_)));

    let err = pipeline
        .execute(&RequestDescriptor::get("https://evil.example/x"))
        .await
        .unwrap_err();
    assert!(matches!(err, GitHubError::InvalidInput(_)));
    assert!(transport.requests().is_empty());
}
