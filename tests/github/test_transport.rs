//! Tests for the reqwest-backed transport against a local mock server.

use bytes::Bytes;
use mockito::{Matcher, Server};
use std::time::Duration;

use ghcmd::github::{HttpError, HttpRequest, HttpTransport, ReqwestTransport};
use ghcmd::HttpMethod;

#[tokio::test]
async fn test_request_round_trip() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/o/r/issues/1/assignees")
        .match_header("accept", "application/vnd.github.v3+json")
        .match_header("authorization", "token abc")
        .match_body(Matcher::JsonString(r#"{"assignees":["octocat"]}"#.into()))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_header("x-ratelimit-remaining", "4999")
        .with_body(r#"{"number":1}"#)
        .create_async()
        .await;

    let transport = ReqwestTransport::with_defaults().unwrap();
    let response = transport
        .send(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/repos/o/r/issues/1/assignees", server.url()),
            headers: vec![
                ("Accept".into(), "application/vnd.github.v3+json".into()),
                ("Authorization".into(), "token abc".into()),
                ("Content-Type".into(), "application/json; charset=UTF-8".into()),
            ],
            body: Some(Bytes::from_static(br#"{"assignees":["octocat"]}"#)),
            timeout: Some(Duration::from_secs(5)),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 201);
    assert_eq!(response.header("X-RateLimit-Remaining"), Some("4999"));
    assert_eq!(response.body, Bytes::from_static(br#"{"number":1}"#));
}

#[tokio::test]
async fn test_error_status_is_not_a_transport_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/o/missing")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let transport = ReqwestTransport::with_defaults().unwrap();
    let response = transport
        .send(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/repos/o/missing", server.url()),
            headers: Vec::new(),
            body: None,
            timeout: None,
        })
        .await
        .unwrap();

    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let transport = ReqwestTransport::with_defaults().unwrap();
    let err = transport
        .send(HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/".into(),
            headers: Vec::new(),
            body: None,
            timeout: Some(Duration::from_secs(2)),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Transport(_) | HttpError::Timeout(_)));
}
