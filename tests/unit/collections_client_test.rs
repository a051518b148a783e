//! HTTP tests for the remote collections client against a mock server.

use collectionbar::services::collections_client::{CollectionsApi, CollectionsClient};
use collectionbar::types::collection::{
    AddLinkRequest, CreateCollectionRequest, UpdateCollectionRequest, Visibility,
};
use collectionbar::types::errors::ApiError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test_key-1";

async fn setup() -> (MockServer, CollectionsClient) {
    let server = MockServer::start().await;
    let client = CollectionsClient::new(&format!("{}/", server.uri()), API_KEY)
        .expect("Failed to build client");
    (server, client)
}

fn collection_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "visibility": "PRIVATE",
        "links": [{
            "id": "l1",
            "name": "Article",
            "url": "https://x",
            "favorite": true,
            "collectionId": id
        }],
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_get_collections_sends_bearer_token() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([collection_json("c1", "Reading")])))
        .expect(1)
        .mount(&server)
        .await;

    let collections = client.get_collections().await.unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "Reading");
    assert_eq!(collections[0].visibility, Visibility::Private);
    assert!(collections[0].links[0].favorite);
    assert_eq!(collections[0].links[0].collection_id, "c1");
}

#[tokio::test]
async fn test_get_collections_accepts_wrapped_body() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": [collection_json("c1", "Reading"), collection_json("c2", "Tools")]
        })))
        .mount(&server)
        .await;

    let collections = client.get_collections().await.unwrap();
    let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Reading", "Tools"]);
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(matches!(
        client.get_collections().await,
        Err(ApiError::HttpStatus(500))
    ));
}

#[tokio::test]
async fn test_unexpected_body_is_invalid_response() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    assert!(matches!(
        client.get_collections().await,
        Err(ApiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_create_update_delete_collection() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/collections"))
        .and(body_json(json!({"name": "Reading"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(collection_json("c1", "Reading")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/collections/c1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"collection": collection_json("c1", "Reading List")})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/collections/c1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_collection(&CreateCollectionRequest {
            name: "Reading".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, "c1");

    let updated = client
        .update_collection(
            "c1",
            &UpdateCollectionRequest {
                id: "c1".to_string(),
                name: "Reading List".to_string(),
                description: None,
                visibility: Visibility::Private,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Reading List");

    client.delete_collection("c1").await.unwrap();
}

#[tokio::test]
async fn test_add_link_posts_camel_case_body() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/links"))
        .and(body_json(json!({
            "name": "Article",
            "url": "https://x",
            "favorite": false,
            "collectionId": "c1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "l9",
            "name": "Article",
            "url": "https://x",
            "collectionId": "c1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client
        .add_link(&AddLinkRequest {
            name: "Article".to_string(),
            url: "https://x".to_string(),
            collection_id: "c1".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(link.id, "l9");
    assert!(!link.favorite);
}

#[tokio::test]
async fn test_check_token() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tokens/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .mount(&server)
        .await;

    let check = client.check_token().await;
    assert!(check.valid);
    assert!(check.message.is_none());
}

#[tokio::test]
async fn test_check_token_never_fails() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tokens/check"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let check = client.check_token().await;
    assert!(!check.valid);
    assert_eq!(check.message.as_deref(), Some("Remote service returned HTTP 401"));

    let unreachable = CollectionsClient::new("http://127.0.0.1:9", API_KEY).unwrap();
    assert!(!unreachable.check_token().await.valid);
}
