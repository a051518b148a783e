//! Unit tests for the message handler, driven through `handle_message` the
//! same way the `collectionbar-rpc` binary drives it.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use collectionbar::app::App;
use collectionbar::managers::bookmark_tree::BookmarkTreeApi;
use collectionbar::rpc_handler::{handle_message, parse_message, MESSAGE_TYPES};
use collectionbar::services::notifications::NotificationService;
use collectionbar::types::bookmark::{BrowserLayout, CreateDetails};
use collectionbar::types::message::Message;

/// Create a fresh App backed by a temp directory.
fn setup() -> (Arc<App>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let app = App::open(
        Some(tmp.path()),
        BrowserLayout::Chromium,
        NotificationService::default(),
    )
    .expect("Failed to open App");
    (Arc::new(app), tmp)
}

// ─── Decoding ───

#[test]
fn test_every_listed_type_is_known() {
    for kind in MESSAGE_TYPES {
        let err = parse_message(&json!({ "type": kind, "unexpected": [] })).err();
        assert_ne!(err.as_deref(), Some("Unknown message type"), "{}", kind);
    }
}

#[test]
fn test_parse_add_link_message() {
    let message = parse_message(&json!({
        "type": "ADD_LINK_TO_COLLECTION",
        "collectionId": "c1",
        "link": {"name": "Article", "url": "https://x"}
    }))
    .unwrap();

    match message {
        Message::AddLinkToCollection { collection_id, link } => {
            assert_eq!(collection_id, "c1");
            assert_eq!(link.url, "https://x");
            assert!(!link.favorite);
        }
        other => panic!("unexpected message {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let (app, _tmp) = setup();
    for raw in [json!({"type": "NOPE"}), json!({}), json!("GET_SETTINGS")] {
        let response = handle_message(&app, &raw).await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Unknown message type"));
    }
}

#[tokio::test]
async fn test_malformed_message_is_rejected() {
    let (app, _tmp) = setup();
    let response = handle_message(&app, &json!({"type": "DELETE_COLLECTION"})).await;
    assert!(!response.success);
    assert!(response
        .error
        .unwrap()
        .starts_with("Invalid DELETE_COLLECTION message"));
}

// ─── Settings ───

#[tokio::test]
async fn test_get_and_update_settings() {
    let (app, _tmp) = setup();

    let response = handle_message(&app, &json!({"type": "GET_SETTINGS"})).await;
    assert!(response.success);
    let data = response.data.unwrap();
    assert_eq!(data["apiKey"], "");
    assert_eq!(data["isInitialized"], false);

    let response = handle_message(
        &app,
        &json!({
            "type": "UPDATE_SETTINGS",
            "settings": {"baseUrl": "https://links.example/", "apiKey": "key_123"}
        }),
    )
    .await;
    assert!(response.success);
    assert_eq!(response.data.unwrap()["baseUrl"], "https://links.example");

    let response = handle_message(
        &app,
        &json!({"type": "UPDATE_SETTINGS", "settings": {"apiKey": "not a key!"}}),
    )
    .await;
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Validation failed: Invalid API key")
    );
}

// ─── Collections ───

#[tokio::test]
async fn test_get_collections_starts_empty() {
    let (app, _tmp) = setup();
    let response = handle_message(&app, &json!({"type": "GET_COLLECTIONS"})).await;
    assert!(response.success);
    assert_eq!(response.data, Some(json!([])));
}

#[tokio::test]
async fn test_sync_without_credentials_answers_from_cache() {
    let (app, _tmp) = setup();
    let response = handle_message(&app, &json!({"type": "SYNC_COLLECTIONS"})).await;
    assert!(response.success);
    assert_eq!(response.data, Some(json!([])));
}

#[tokio::test]
async fn test_add_to_collection_without_collections_is_not_queued() {
    let (app, _tmp) = setup();
    let response = handle_message(
        &app,
        &json!({"type": "ADD_TO_COLLECTION", "url": "https://page.example", "name": "Page"}),
    )
    .await;
    assert!(response.success);
    assert_eq!(response.data, Some(json!({"queued": false})));
}

// ─── Lifecycle ───

#[tokio::test]
async fn test_initialize_and_reset_round_trip() {
    let (app, _tmp) = setup();
    app.bookmarks()
        .create(CreateDetails::link("1", "Mine", "https://mine.example"))
        .await
        .unwrap();

    let response = handle_message(&app, &json!({"type": "INITIALIZE_EXTENSION"})).await;
    assert!(response.success);
    assert!(response.data.is_none());
    assert!(app.bookmarks().get_children("1").await.unwrap().is_empty());

    let response = handle_message(&app, &json!({"type": "RESET_EXTENSION"})).await;
    assert!(response.success);
    assert_eq!(response.data, Some(json!({"restored": 1})));
    assert_eq!(app.bookmarks().get_children("1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_page_visibility_schedules_sync() {
    let (app, _tmp) = setup();
    let response = handle_message(&app, &json!({"type": "PAGE_VISIBILITY"})).await;
    assert!(response.success);
    assert!(app.is_sync_pending());
}
