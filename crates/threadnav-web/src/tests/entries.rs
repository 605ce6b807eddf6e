use axum::http::StatusCode;
use serde_json::{Value, json};

use threadnav_core::models::{NavEntry, NavigatorTree};

use super::harness::{TestHarness, WORKED_EXAMPLE, decode_json, json_request};

#[tokio::test]
async fn add_entry_then_read_back_outline_tree() {
    let harness = TestHarness::setup();
    harness.seed_navigator("chat-1");

    let response = harness
        .send(json_request(
            "/navigator/chat-1/entries",
            json!({
                "assistantMessageId": "m1",
                "userMessageId": "u1",
                "assistantMessage": WORKED_EXAMPLE,
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let entry: NavEntry = decode_json(response).await;
    assert_eq!(entry.label, "Intro");
    assert_eq!(entry.user_message_id, "u1");

    let tree: NavigatorTree = decode_json(harness.get("/navigator/chat-1").await).await;
    assert_eq!(tree.entries.len(), 1);
    assert_eq!(tree.entries[0].entry, entry);
    let sections = &tree.entries[0].sections;
    let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Setup", "Step 1", "Step 2", "Results"]);
    assert!(sections.iter().all(|s| s.anchor == "a--m1"));
}

#[tokio::test]
async fn read_back_json_uses_camel_case_and_null_parents() {
    let harness = TestHarness::setup();
    harness.seed_navigator("chat-1");
    harness
        .send(json_request(
            "/navigator/chat-1/entries",
            json!({"assistantMessageId": "m1", "assistantMessage": WORKED_EXAMPLE}),
        ))
        .await;

    let raw: Value = decode_json(harness.get("/navigator/chat-1").await).await;
    let entry = &raw["entries"][0];
    assert_eq!(entry["assistantMessageId"], "m1");
    let first = &entry["sections"][0];
    assert_eq!(first["orderIndex"], 2);
    assert_eq!(first["parentId"], Value::Null);
    assert_eq!(entry["sections"][1]["parentId"], first["id"]);
}

#[tokio::test]
async fn add_entry_without_headings_is_unprocessable() {
    let harness = TestHarness::setup();
    harness.seed_navigator("chat-1");

    let response = harness
        .send(json_request(
            "/navigator/chat-1/entries",
            json!({"assistantMessageId": "m1", "assistantMessage": "no headings here"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["code"], "EXTRACTION_EMPTY");
    assert_eq!(payload["details"]["assistantMessageId"], "m1");

    let tree: NavigatorTree = decode_json(harness.get("/navigator/chat-1").await).await;
    assert!(tree.entries.is_empty());
}

#[tokio::test]
async fn add_entry_for_unknown_chat_is_not_found() {
    let harness = TestHarness::setup();

    let response = harness
        .send(json_request(
            "/navigator/ghost/entries",
            json!({"assistantMessageId": "m1", "assistantMessage": WORKED_EXAMPLE}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_reply_is_conflict() {
    let harness = TestHarness::setup();
    harness.seed_navigator("chat-1");
    let body = json!({"assistantMessageId": "m1", "assistantMessage": WORKED_EXAMPLE});

    let first = harness
        .send(json_request("/navigator/chat-1/entries", body.clone()))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = harness
        .send(json_request("/navigator/chat-1/entries", body))
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let payload: Value = decode_json(second).await;
    assert_eq!(payload["code"], "REPOSITORY_CONFLICT");
}

#[tokio::test]
async fn preview_outline_returns_label_and_sections_without_storing() {
    let harness = TestHarness::setup();

    let response = harness
        .send(json_request(
            "/outline/preview",
            json!({"assistantMessage": "## 1. Plan\n## 2. Configuration\n", "assistantMessageId": "m7"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = decode_json(response).await;
    assert_eq!(payload["entryLabel"], "Plan");
    assert_eq!(payload["sections"][0]["label"], "Configuration");
    assert_eq!(payload["sections"][0]["anchor"], "a--m7");
}
