//! Integration tests for service history and image attachments.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The salon server running (cargo run -p lotus-bloom-server)
//!
//! Run with: cargo test -p lotus-bloom-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the salon API (configurable via environment).
fn base_url() -> String {
    std::env::var("SALON_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Test helper: Create a customer with a unique name, returning its id.
async fn create_test_customer(client: &Client) -> i64 {
    let base_url = base_url();
    let name = format!("Test Customer {}", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/customers"))
        .json(&json!({ "name": name, "phone": "(555) 000-1234" }))
        .send()
        .await
        .expect("Failed to create test customer");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse customer");
    body["id"].as_i64().expect("Customer id missing")
}

/// Test helper: Delete a customer, ignoring the outcome.
async fn delete_test_customer(client: &Client, customer_id: i64) {
    let base_url = base_url();
    let _ = client
        .delete(format!("{base_url}/api/customers/{customer_id}"))
        .send()
        .await;
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_service_crud_lifecycle() {
    let client = Client::new();
    let base_url = base_url();
    let customer_id = create_test_customer(&client).await;

    // Create
    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({
            "customerId": customer_id,
            "serviceName": "Hair Coloring",
            "staffName": "Jennifer (Stylist)",
            "notes": "root touch-up",
            "price": "85.00",
            "serviceDate": "2002-02-14T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create service");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let service: Value = resp.json().await.expect("Failed to parse service");
    let id = service["id"].as_i64().expect("Service id missing");
    assert_eq!(service["customerId"], customer_id);
    assert_eq!(service["serviceName"], "Hair Coloring");
    assert_eq!(service["price"], "85.00");
    assert!(service["serviceTypeId"].is_null());

    // Update: new notes and price
    let resp = client
        .put(format!("{base_url}/api/services/{id}"))
        .json(&json!({
            "customerId": customer_id,
            "serviceName": "Hair Coloring",
            "staffName": "Ashley (Colorist)",
            "notes": "full highlights",
            "price": "150.00",
            "serviceDate": "2002-02-14T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to update service");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse service");
    assert_eq!(body["staffName"], "Ashley (Colorist)");
    assert_eq!(body["price"], "150.00");

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/services/{id}"))
        .send()
        .await
        .expect("Failed to delete service");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .delete(format!("{base_url}/api/services/{id}"))
        .send()
        .await
        .expect("Failed to delete missing service");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    delete_test_customer(&client, customer_id).await;
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_service_requires_existing_customer() {
    let client = Client::new();
    let base_url = base_url();

    // The customer reference comes from the body, so this is a 400
    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({
            "customerId": 999_999,
            "serviceName": "Haircut"
        }))
        .send()
        .await
        .expect("Failed to post service for missing customer");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_service_validation() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({
            "customerId": 0,
            "serviceName": "X",
            "price": "-5"
        }))
        .send()
        .await
        .expect("Failed to post invalid service");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    let errors = body["errors"].as_array().expect("Expected errors array");
    assert!(errors.iter().any(|e| e["field"] == "serviceName"));
    assert!(errors.iter().any(|e| e["field"] == "customerId"));
    assert!(errors.iter().any(|e| e["field"] == "price"));
}

// ============================================================================
// Image Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_service_image_lifecycle() {
    let client = Client::new();
    let base_url = base_url();
    let customer_id = create_test_customer(&client).await;

    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({
            "customerId": customer_id,
            "serviceName": "Hair Coloring"
        }))
        .send()
        .await
        .expect("Failed to create service");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let service: Value = resp.json().await.expect("Failed to parse service");
    let service_id = service["id"].as_i64().expect("Service id missing");

    // Attach
    let resp = client
        .post(format!("{base_url}/api/services/{service_id}/images"))
        .json(&json!({ "imageUrl": "https://example.com/before.jpg" }))
        .send()
        .await
        .expect("Failed to attach image");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let image: Value = resp.json().await.expect("Failed to parse image");
    let image_id = image["id"].as_i64().expect("Image id missing");
    assert_eq!(image["serviceId"], service_id);
    assert_eq!(image["imageUrl"], "https://example.com/before.jpg");

    // Listed
    let resp = client
        .get(format!("{base_url}/api/services/{service_id}/images"))
        .send()
        .await
        .expect("Failed to list images");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse image list");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Detach
    let resp = client
        .delete(format!("{base_url}/api/services/images/{image_id}"))
        .send()
        .await
        .expect("Failed to delete image");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/services/{service_id}/images"))
        .send()
        .await
        .expect("Failed to list images");
    let body: Value = resp.json().await.expect("Failed to parse image list");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    delete_test_customer(&client, customer_id).await;
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_image_rejects_unusable_urls() {
    let client = Client::new();
    let base_url = base_url();
    let customer_id = create_test_customer(&client).await;

    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({ "customerId": customer_id, "serviceName": "Haircut" }))
        .send()
        .await
        .expect("Failed to create service");
    let service: Value = resp.json().await.expect("Failed to parse service");
    let service_id = service["id"].as_i64().expect("Service id missing");

    let resp = client
        .post(format!("{base_url}/api/services/{service_id}/images"))
        .json(&json!({ "imageUrl": "javascript:alert(1)" }))
        .send()
        .await
        .expect("Failed to post bad image url");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    let errors = body["errors"].as_array().expect("Expected errors array");
    assert!(errors.iter().any(|e| e["field"] == "imageUrl"));

    delete_test_customer(&client, customer_id).await;
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_images_for_missing_service_not_found() {
    let client = Client::new();
    let base_url = base_url();

    // The service reference comes from the path, so both reads and writes 404
    let resp = client
        .get(format!("{base_url}/api/services/999999/images"))
        .send()
        .await
        .expect("Failed to list images of missing service");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("{base_url}/api/services/999999/images"))
        .json(&json!({ "imageUrl": "https://example.com/after.jpg" }))
        .send()
        .await
        .expect("Failed to attach image to missing service");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_deleting_service_removes_images() {
    let client = Client::new();
    let base_url = base_url();
    let customer_id = create_test_customer(&client).await;

    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({ "customerId": customer_id, "serviceName": "Hair Coloring" }))
        .send()
        .await
        .expect("Failed to create service");
    let service: Value = resp.json().await.expect("Failed to parse service");
    let service_id = service["id"].as_i64().expect("Service id missing");

    let resp = client
        .post(format!("{base_url}/api/services/{service_id}/images"))
        .json(&json!({ "imageUrl": "https://example.com/before.jpg" }))
        .send()
        .await
        .expect("Failed to attach image");
    let image: Value = resp.json().await.expect("Failed to parse image");
    let image_id = image["id"].as_i64().expect("Image id missing");

    let resp = client
        .delete(format!("{base_url}/api/services/{service_id}"))
        .send()
        .await
        .expect("Failed to delete service");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The image went with the service
    let resp = client
        .delete(format!("{base_url}/api/services/images/{image_id}"))
        .send()
        .await
        .expect("Failed to delete orphaned image");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    delete_test_customer(&client, customer_id).await;
}
