//! Integration tests for `UpstreamClient` against a `wiremock` backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricebyte_upstream::{NutritionSource, UpstreamClient, UpstreamError};

fn test_client(base_url: &str) -> UpstreamClient {
    UpstreamClient::new(
        base_url,
        Duration::from_secs(5),
        Duration::from_secs(1),
        "pricebyte-test/0.1",
    )
    .expect("failed to build test UpstreamClient")
}

fn product_json() -> serde_json::Value {
    json!({
        "id": 5,
        "name": "Full Cream Milk",
        "brand": "Dairy Farmers",
        "category": "dairy",
        "size": "2L",
        "unit": "L",
        "image_url": null,
        "description": "Fresh milk",
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00",
        "store_products": [{
            "id": 9,
            "store": "coles",
            "store_product_id": "CL1",
            "store_name": "Coles",
            "current_price": 3.1,
            "availability": true,
            "product_url": null,
            "raw_details": {
                "nutrition": {"breakdown": [{
                    "title": "Per 100mL",
                    "nutrients": [{"nutrient": "Energy", "value": "272 kJ"}]
                }]}
            },
            "created_at": "2025-01-01T00:00:00",
            "updated_at": "2025-01-01T00:00:00",
            "price_history": []
        }]
    })
}

#[tokio::test]
async fn fetch_product_parses_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json()))
        .mount(&server)
        .await;

    let product = test_client(&server.uri())
        .fetch_product(5)
        .await
        .expect("fetch should succeed");

    assert_eq!(product.id, 5);
    assert_eq!(product.store_products.len(), 1);
    assert!(matches!(
        product.store_products[0].nutrition(),
        NutritionSource::Breakdown(_)
    ));
}

#[tokio::test]
async fn fetch_product_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_product(404).await;
    assert!(
        matches!(result, Err(UpstreamError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_product_maps_5xx_to_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_product(1).await;
    assert!(
        matches!(result, Err(UpstreamError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_product_reports_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_product(2).await;
    assert!(
        matches!(result, Err(UpstreamError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

#[tokio::test]
async fn search_returns_body_verbatim() {
    let server = MockServer::start().await;
    let body = r#"{"results":[{"id":1,"name":"Milk"}],"total_count":1,"offset":0,"limit":10,"has_next":false}"#;
    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .and(query_param("q", "milk"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let page = test_client(&server.uri())
        .search("milk", 0, 10)
        .await
        .expect("search should succeed");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, body);
}

#[tokio::test]
async fn search_times_out_when_backend_is_slow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).search("slow", 0, 10).await;
    assert!(
        matches!(result, Err(UpstreamError::Timeout { timeout_secs: 1, .. })),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn search_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).search("milk", 0, 10).await;
    assert!(
        matches!(result, Err(UpstreamError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}
