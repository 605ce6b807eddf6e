use axum::http::StatusCode;
use serde_json::{Value, json};

use threadnav_core::models::{Navigator, NavigatorTree};

use super::harness::{TestHarness, decode_json, json_request};

#[tokio::test]
async fn create_navigator_returns_created_navigator() {
    let harness = TestHarness::setup();

    let response = harness
        .send(json_request(
            "/navigator",
            json!({"chatId": "chat-1", "chatTitle": "Planning"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let navigator: Navigator = decode_json(response).await;
    assert_eq!(navigator.chat_id, "chat-1");
    assert_eq!(navigator.chat_title, "Planning");
    assert!(!navigator.id.is_empty());
}

#[tokio::test]
async fn create_navigator_twice_is_conflict() {
    let harness = TestHarness::setup();
    harness.seed_navigator("chat-1");

    let response = harness
        .send(json_request("/navigator", json!({"chatId": "chat-1"})))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "CONFLICT");
    assert_eq!(payload["operation"], "navigator.create");
    assert_eq!(payload["chat_id"], "chat-1");
}

#[tokio::test]
async fn create_navigator_with_blank_chat_is_bad_request() {
    let harness = TestHarness::setup();

    let response = harness
        .send(json_request("/navigator", json!({"chatId": "   "})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn create_navigator_rejects_malformed_json() {
    let harness = TestHarness::setup();

    let response = harness
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/navigator")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .expect("request"),
        )
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn get_navigator_returns_empty_entry_list_for_new_chat() {
    let harness = TestHarness::setup();
    harness.seed_navigator("chat-1");

    let response = harness.get("/navigator/chat-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let tree: NavigatorTree = decode_json(response).await;
    assert_eq!(tree.navigator.chat_id, "chat-1");
    assert!(tree.entries.is_empty());
}

#[tokio::test]
async fn get_unknown_navigator_is_not_found() {
    let harness = TestHarness::setup();

    let response = harness.get("/navigator/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "NOT_FOUND");
    assert_eq!(payload["chat_id"], "missing");
}
