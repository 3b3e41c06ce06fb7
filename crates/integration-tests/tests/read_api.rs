//! Integration tests for the mirror read API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The mirror server running (cargo run -p woo-mirror-server)
//!
//! Run with: cargo test -p woo-mirror-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

use woo_mirror_integration_tests::base_url;

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_health() {
    let resp = Client::new()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_readiness() {
    let resp = Client::new()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Order Listing Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_orders_list_envelope() {
    let resp = Client::new()
        .get(format!("{}/api/v1/orders", base_url()))
        .send()
        .await
        .expect("Failed to list orders");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert!(body["total"].is_i64());
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_orders_list_limit_is_clamped() {
    let resp = Client::new()
        .get(format!("{}/api/v1/orders?limit=10000", base_url()))
        .send()
        .await
        .expect("Failed to list orders");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["limit"], 100);
}

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_orders_search_is_case_insensitive() {
    let client = Client::new();

    let lower: Value = client
        .get(format!("{}/api/v1/orders?search=jane", base_url()))
        .send()
        .await
        .expect("Failed to search orders")
        .json()
        .await
        .expect("Failed to parse response");

    let upper: Value = client
        .get(format!("{}/api/v1/orders?search=JANE", base_url()))
        .send()
        .await
        .expect("Failed to search orders")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(lower["total"], upper["total"]);
}

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_order_detail_missing_is_404() {
    let resp = Client::new()
        .get(format!("{}/api/v1/orders/999999999", base_url()))
        .send()
        .await
        .expect("Failed to fetch order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Product Listing Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_products_list_rows_carry_order_count() {
    let resp = Client::new()
        .get(format!("{}/api/v1/products", base_url()))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    for row in body["data"].as_array().expect("data array") {
        assert!(row["order_count"].is_i64());
        assert!(row["id"].is_i64());
    }
}

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_products_sort_by_price() {
    let resp = Client::new()
        .get(format!(
            "{}/api/v1/products?sort_by=price&sort_order=asc&limit=100",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    let prices: Vec<f64> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|row| row["price"].as_str())
        .filter_map(|p| p.parse().ok())
        .collect();

    let mut sorted = prices.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(prices, sorted);
}

// ============================================================================
// Stats Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running mirror server"]
async fn test_stats_counts() {
    let resp = Client::new()
        .get(format!("{}/api/v1/stats", base_url()))
        .send()
        .await
        .expect("Failed to fetch stats");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert!(body["orders"].as_i64().expect("orders count") >= 0);
    assert!(body["products"].as_i64().expect("products count") >= 0);
}
