//! Integration tests for `ShopifyClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers catalog pagination, the write endpoints
//! and every error variant the client can propagate.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skulink_shopify::types::{
    ShopifyInventoryPatch, ShopifyProduct, ShopifyVariant, ShopifyVariantPatch,
};
use skulink_shopify::{ShopifyClient, ShopifyError};

const PRODUCTS_PATH: &str = "/admin/api/2024-07/products.json";

/// Builds a client pointed at the mock server: 5-second timeout, test UA.
fn test_client(server: &MockServer) -> ShopifyClient {
    ShopifyClient::new(&server.uri(), "shpat_test", 5, "skulink-test/0.1")
        .expect("failed to build test ShopifyClient")
}

/// Minimal valid one-product page fixture.
fn one_product_json(id: i64) -> serde_json::Value {
    json!({
        "products": [{
            "id": id,
            "title": "Test Product",
            "status": "active",
            "variants": [{
                "id": 101,
                "product_id": id,
                "title": "Default Title",
                "sku": "TP-1",
                "price": "12.99",
                "compare_at_price": null,
                "inventory_management": "shopify",
                "inventory_quantity": 4
            }]
        }]
    })
}

// ---------------------------------------------------------------------------
// Catalog fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_products_returns_empty_vec_for_empty_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"products": []})))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_all_products_sends_access_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_product_json(1)))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn fetch_all_products_follows_pagination_cursors() {
    let server = MockServer::start().await;

    let next_link = format!(
        "<{base}{PRODUCTS_PATH}?limit=100&page_info=cursor2>; rel=\"next\"",
        base = server.uri()
    );

    // Page 1: one product plus a Link header pointing at page 2.
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&one_product_json(1))
                .insert_header("Link", next_link.as_str()),
        )
        .mount(&server)
        .await;

    // Page 2: last page, no Link header.
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(query_param("page_info", "cursor2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_product_json(2)))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let products = result.unwrap();
    assert_eq!(products.len(), 2, "expected 2 products across 2 pages");
    assert_eq!(products[0].id, Some(1));
    assert_eq!(products[1].id, Some(2));
}

#[tokio::test]
async fn fetch_all_products_propagates_rate_limit_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    match result.unwrap_err() {
        ShopifyError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 30),
        other => panic!("expected ShopifyError::RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_products_rate_limit_defaults_to_60s() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    match result.unwrap_err() {
        ShopifyError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 60),
        other => panic!("expected ShopifyError::RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_products_propagates_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    assert!(
        matches!(result.unwrap_err(), ShopifyError::NotFound { .. }),
        "expected ShopifyError::NotFound"
    );
}

#[tokio::test]
async fn fetch_all_products_second_page_failure_discards_partial_results() {
    let server = MockServer::start().await;

    let next_link = format!(
        "<{base}{PRODUCTS_PATH}?limit=100&page_info=cursor_fail>; rel=\"next\"",
        base = server.uri()
    );

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&one_product_json(1))
                .insert_header("Link", next_link.as_str()),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(query_param("page_info", "cursor_fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    match result.unwrap_err() {
        ShopifyError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("expected ShopifyError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_all_products_propagates_malformed_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_all_products(100).await;
    assert!(
        matches!(result.unwrap_err(), ShopifyError::Deserialize { .. }),
        "expected ShopifyError::Deserialize"
    );
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_product_posts_envelope_and_returns_stored_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(&json!({
            "product": {
                "id": 999,
                "title": "Created",
                "variants": [{"id": 9001, "product_id": 999, "title": "Default Title", "price": "5.00"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product = ShopifyProduct {
        title: "Created".to_string(),
        variants: vec![ShopifyVariant {
            title: "Default Title".to_string(),
            price: "5.00".to_string(),
            ..ShopifyVariant::default()
        }],
        ..ShopifyProduct::default()
    };

    let created = test_client(&server)
        .create_product(&product)
        .await
        .expect("create failed");
    assert_eq!(created.id, Some(999));
    assert_eq!(created.variants[0].id, Some(9001));
}

#[tokio::test]
async fn create_variant_posts_to_parent_product() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/api/2024-07/products/42/variants.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&json!({
            "variant": {"id": 707, "product_id": 42, "title": "Large", "price": "8.00"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let variant = ShopifyVariant {
        title: "Large".to_string(),
        price: "8.00".to_string(),
        ..ShopifyVariant::default()
    };

    let created = test_client(&server)
        .create_variant(42, &variant)
        .await
        .expect("create variant failed");
    assert_eq!(created.id, Some(707));
}

#[tokio::test]
async fn update_variant_sends_only_patched_fields() {
    let server = MockServer::start().await;

    // The body matcher pins the minimal-diff contract: an inventory-only
    // patch must not carry a price field.
    Mock::given(method("PUT"))
        .and(path("/admin/api/2024-07/variants/707.json"))
        .and(body_json(json!({
            "variant": {"id": 707, "inventory_management": "shopify", "inventory_quantity": 12}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"variant": {"id": 707}})))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ShopifyVariantPatch {
        id: 707,
        price: None,
        inventory: Some(ShopifyInventoryPatch::Tracked(12)),
    };

    let result = test_client(&server).update_variant(patch).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn update_variant_surfaces_unexpected_status_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/api/2024-07/variants/707.json"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"errors":{"price":["invalid"]}}"#),
        )
        .mount(&server)
        .await;

    let patch = ShopifyVariantPatch {
        id: 707,
        price: Some("-1".to_string()),
        ..ShopifyVariantPatch::default()
    };

    let result = test_client(&server).update_variant(patch).await;
    match result.unwrap_err() {
        ShopifyError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 422);
            assert!(body.contains("invalid"));
        }
        other => panic!("expected ShopifyError::UnexpectedStatus, got: {other:?}"),
    }
}
