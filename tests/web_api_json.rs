//! Web API JSON Tests
//!
//! Integration tests for strict JSON decoding through the slug endpoint.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::create_test_server;
use webtoolkit::ToolkitConfig;

#[tokio::test]
async fn test_slug() {
    let ctx = create_test_server(ToolkitConfig::default());

    let response = ctx
        .server
        .post("/api/slug")
        .json(&json!({ "text": "NOW!!? is the time 123" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/json");
    let body: Value = response.json();
    assert_eq!(body["error"], false);
    assert_eq!(body["data"]["slug"], "now-is-the-time-123");
}

#[tokio::test]
async fn test_slug_empty_result() {
    let ctx = create_test_server(ToolkitConfig::default());

    let response = ctx
        .server
        .post("/api/slug")
        .json(&json!({ "text": "  !!! " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "empty string not permitted");
}

#[tokio::test]
async fn test_slug_unknown_field() {
    let ctx = create_test_server(ToolkitConfig::default());

    let response = ctx
        .server
        .post("/api/slug")
        .json(&json!({ "text": "hello", "lang": "en" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "body contains unknown key \"lang\"");
}

#[tokio::test]
async fn test_slug_unknown_field_allowed() {
    let ctx = create_test_server(ToolkitConfig::default().with_allow_unknown_json_fields(true));

    let response = ctx
        .server
        .post("/api/slug")
        .json(&json!({ "text": "hello world", "lang": "en" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["slug"], "hello-world");
}

#[tokio::test]
async fn test_slug_body_too_large() {
    let ctx = create_test_server(ToolkitConfig::default().with_max_json_size(16));

    let response = ctx
        .server
        .post("/api/slug")
        .json(&json!({ "text": "a rather long piece of text" }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["message"], "body must be no larger than 16 bytes");
}

#[tokio::test]
async fn test_slug_rejects_bad_bodies() {
    let ctx = create_test_server(ToolkitConfig::default());

    let cases = [
        ("", "body must not be empty"),
        ("{\"text\": 1}", "body contains incorrect JSON type"),
        ("{\"text\": \"a\"}{\"text\": \"b\"}", "body must only contain a single JSON value"),
        ("{text: \"a\"}", "body contains badly-formed JSON"),
        ("Hello, world", "body contains badly-formed JSON"),
    ];

    for (input, expected) in cases {
        let response = ctx
            .server
            .post("/api/slug")
            .text(input)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], true, "{input:?}");
        assert!(
            body["message"].as_str().unwrap().starts_with(expected),
            "{input:?}: {}",
            body["message"]
        );
    }
}
