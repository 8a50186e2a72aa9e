//! Integration tests for `RestCatalog` using wiremock HTTP mocks.

use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrine_core::item::ItemPayload;
use vitrine_gateway::{GatewayError, RestCatalog, SettingsPayload};

fn test_client(base_url: &str) -> RestCatalog {
    RestCatalog::with_base_url("test-key", 30, base_url, "items")
        .expect("client construction should not fail")
}

fn item_row(id: &str, title: &str, position: i32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": "Aço carbono, cabo de madeira",
        "price_cents": 35_000,
        "image_path": "items/legacy.jpg",
        "image_paths": ["items/a.jpg", "items/b.jpg"],
        "whatsapp_message": null,
        "published": true,
        "position": position,
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-02T08:30:00Z"
    })
}

fn item_payload(title: &str) -> ItemPayload {
    ItemPayload {
        title: title.to_string(),
        description: "desc".to_string(),
        price_cents: 5_000,
        image_path: String::new(),
        image_paths: vec![],
        whatsapp_message: Some("nesta faca".to_string()),
        published: true,
        position: 2,
    }
    .with_image_paths(vec!["items/x.jpg".to_string()])
}

#[tokio::test]
async fn list_published_items_filters_and_orders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("published", "eq.true"))
        .and(query_param("order", "position.asc"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            item_row("7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b", "Faca chef", 1),
            item_row("0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9", "Canivete", 2),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client
        .list_published_items()
        .await
        .expect("should parse items");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Faca chef");
    assert_eq!(items[0].image_paths.len(), 2);
    assert_eq!(items[1].position, 2);
}

#[tokio::test]
async fn list_items_returns_unpublished_rows_too() {
    let server = MockServer::start().await;

    let mut row = item_row("7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b", "Rascunho", 0);
    row["published"] = serde_json::json!(false);

    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .and(query_param("order", "position.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let items = client.list_items().await.expect("should parse items");
    assert_eq!(items.len(), 1);
    assert!(!items[0].published);
}

#[tokio::test]
async fn get_settings_returns_the_singleton() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": "11111111-2222-3333-4444-555555555555",
            "whatsapp_number": "+55 41 99999-9999",
            "whatsapp_message": "nesta faca artesanal",
            "updated_at": "2024-05-01T12:00:00Z"
        }])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let settings = client.get_settings().await.expect("should parse settings");
    assert_eq!(settings.whatsapp_number, "+55 41 99999-9999");
}

#[tokio::test]
async fn get_settings_missing_row_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.get_settings().await;
    assert!(
        matches!(result, Err(GatewayError::Api(ref msg)) if msg.contains("singleton")),
        "expected missing-singleton error, got: {result:?}"
    );
}

#[tokio::test]
async fn insert_item_posts_payload_and_returns_stored_row() {
    let server = MockServer::start().await;
    let payload = item_payload("Faca nova");

    Mock::given(method("POST"))
        .and(path("/rest/v1/items"))
        .and(header("prefer", "return=representation"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([item_row(
            "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b",
            "Faca nova",
            2
        )])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let item = client
        .insert_item(&payload)
        .await
        .expect("should insert item");
    assert_eq!(item.title, "Faca nova");
}

#[tokio::test]
async fn update_item_patches_by_id_filter() {
    let server = MockServer::start().await;
    let id: Uuid = "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b".parse().expect("uuid");
    let payload = item_payload("Faca editada");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", format!("eq.{id}")))
        .and(header("prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([item_row(
            "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b",
            "Faca editada",
            2
        )])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let item = client
        .update_item(id, &payload)
        .await
        .expect("should update item");
    assert_eq!(item.title, "Faca editada");
}

#[tokio::test]
async fn update_item_with_no_matching_row_is_an_api_error() {
    let server = MockServer::start().await;
    let id: Uuid = "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b".parse().expect("uuid");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.update_item(id, &item_payload("x")).await;
    assert!(
        matches!(result, Err(GatewayError::Api(ref msg)) if msg.contains(&id.to_string())),
        "expected no-row error, got: {result:?}"
    );
}

#[tokio::test]
async fn delete_item_targets_the_id_filter() {
    let server = MockServer::start().await;
    let id: Uuid = "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b".parse().expect("uuid");

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.delete_item(id).await.expect("should delete");
}

#[tokio::test]
async fn set_published_patches_only_the_flag() {
    let server = MockServer::start().await;
    let id: Uuid = "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b".parse().expect("uuid");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/items"))
        .and(query_param("id", format!("eq.{id}")))
        .and(body_json(serde_json::json!({ "published": false })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .set_published(id, false)
        .await
        .expect("should toggle published");
}

#[tokio::test]
async fn upsert_settings_merges_duplicates() {
    let server = MockServer::start().await;
    let payload = SettingsPayload {
        id: "11111111-2222-3333-4444-555555555555".parse().expect("uuid"),
        whatsapp_number: "+55 41 98888-7777".to_string(),
        whatsapp_message: "nesta peça".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/rest/v1/settings"))
        .and(header("prefer", "resolution=merge-duplicates"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .upsert_settings(&payload)
        .await
        .expect("should upsert settings");
}

#[tokio::test]
async fn upload_image_posts_bytes_and_returns_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/items/items/abc-faca.jpg"))
        .and(header("content-type", "image/jpeg"))
        .and(header("cache-control", "3600"))
        .and(header("x-upsert", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "items/items/abc-faca.jpg"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let key = client
        .upload_image("items/abc-faca.jpg", vec![0xFF, 0xD8, 0xFF], "image/jpeg")
        .await
        .expect("should upload");
    assert_eq!(key, "items/abc-faca.jpg");
}

#[tokio::test]
async fn upload_failure_surfaces_the_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/items/items/dup.jpg"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "The resource already exists"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .upload_image("items/dup.jpg", vec![1, 2, 3], "image/jpeg")
        .await;
    assert!(
        matches!(result, Err(GatewayError::Api(ref msg)) if msg.contains("already exists")),
        "expected backend message, got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_rows_are_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "unexpected": "shape" }])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_items().await;
    assert!(
        matches!(result, Err(GatewayError::Deserialize { ref context, .. }) if context == "list_items"),
        "expected deserialize error, got: {result:?}"
    );
}
