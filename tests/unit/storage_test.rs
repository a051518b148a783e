//! Unit tests for the JSON settings and cache store.
//!
//! Each test works on its own temporary directory.

use std::fs;

use collectionbar::services::storage::{StorageService, StorageServiceTrait, EXTENSION_DATA_KEY};
use collectionbar::types::collection::{Collection, Visibility};
use collectionbar::types::errors::StorageError;
use collectionbar::types::settings::{PendingLink, SettingsUpdate, DEFAULT_BASE_URL};
use tempfile::TempDir;

fn setup() -> (TempDir, StorageService) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = StorageService::new(Some(dir.path().join("nested").join("storage.json")));
    (dir, storage)
}

fn collection(id: &str, name: &str) -> Collection {
    Collection {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        visibility: Visibility::Public,
        icon: None,
        links: vec![],
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn test_missing_file_yields_defaults() {
    let (_dir, storage) = setup();
    let settings = storage.get_settings().unwrap();

    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert!(settings.api_key.is_empty());
    assert!(!settings.is_initialized);
    assert!(storage.get_collections().unwrap().is_empty());
    assert!(storage.get_pending_link().unwrap().is_none());
}

#[test]
fn test_set_settings_merges_and_strips_trailing_slash() {
    let (_dir, storage) = setup();
    storage
        .set_settings(SettingsUpdate {
            base_url: Some("https://links.example/".to_string()),
            api_key: Some("key_123".to_string()),
            ..Default::default()
        })
        .unwrap();
    let settings = storage
        .set_settings(SettingsUpdate {
            is_initialized: Some(true),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(settings.base_url, "https://links.example");
    assert_eq!(settings.api_key, "key_123");
    assert!(settings.is_initialized);
    assert_eq!(storage.get_settings().unwrap(), settings);
}

#[test]
fn test_document_uses_camel_case_keys() {
    let (_dir, storage) = setup();
    storage
        .set_settings(SettingsUpdate {
            api_key: Some("abc".to_string()),
            ..Default::default()
        })
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
    assert_eq!(raw[EXTENSION_DATA_KEY]["settings"]["apiKey"], "abc");
    assert_eq!(raw[EXTENSION_DATA_KEY]["settings"]["isInitialized"], false);
}

#[test]
fn test_collections_and_cache() {
    let (_dir, storage) = setup();
    let collections = vec![collection("1", "Reading"), collection("2", "Tools")];

    storage.set_collections(&collections).unwrap();
    let stamp = storage.update_cache(&collections).unwrap();

    assert_eq!(storage.get_collections().unwrap(), collections);
    let cache = storage.get_cache().unwrap();
    assert_eq!(cache.collections, collections);
    assert_eq!(cache.last_sync, stamp);
    assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
}

#[test]
fn test_wrapped_collections_are_accepted() {
    let (_dir, storage) = setup();
    fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    fs::write(
        storage.path(),
        r#"{"extension_data": {"collections": {"collections": [
            {"id": "1", "name": "Reading", "visibility": "PRIVATE"}
        ]}}}"#,
    )
    .unwrap();

    let collections = storage.get_collections().unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "Reading");
    assert_eq!(storage.get_settings().unwrap().base_url, DEFAULT_BASE_URL);
}

#[test]
fn test_malformed_file_is_a_serialization_error() {
    let (_dir, storage) = setup();
    fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    fs::write(storage.path(), "{ not json").unwrap();

    assert!(matches!(
        storage.get_settings(),
        Err(StorageError::SerializationError(_))
    ));
}

#[test]
fn test_pending_link_lifecycle() {
    let (_dir, storage) = setup();
    let link = PendingLink {
        url: "https://page.example".to_string(),
        name: "Page".to_string(),
    };

    storage.set_pending_link(&link).unwrap();
    assert_eq!(storage.get_pending_link().unwrap(), Some(link));

    storage.remove_pending_link().unwrap();
    assert!(storage.get_pending_link().unwrap().is_none());
    storage.remove_pending_link().unwrap();
}

#[test]
fn test_clear_storage_keeps_pending_link() {
    let (_dir, storage) = setup();
    storage.set_collections(&[collection("1", "Reading")]).unwrap();
    storage
        .set_pending_link(&PendingLink {
            url: "https://page.example".to_string(),
            name: "Page".to_string(),
        })
        .unwrap();

    storage.clear_storage().unwrap();

    assert!(storage.get_collections().unwrap().is_empty());
    assert_eq!(storage.get_settings().unwrap().base_url, DEFAULT_BASE_URL);
    assert!(storage.get_pending_link().unwrap().is_some());
}
