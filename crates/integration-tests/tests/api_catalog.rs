//! Integration tests for the service catalog (categories and types).
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

/// Test helper: Create a category with a unique name, returning its id.
async fn create_test_category(client: &Client) -> i64 {
    let base_url = base_url();
    let name = format!("Test Category {}", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/service-categories"))
        .json(&json!({ "name": name, "description": "created by integration test" }))
        .send()
        .await
        .expect("Failed to create test category");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse category");
    body["id"].as_i64().expect("Category id missing")
}

/// Test helper: Delete a category, ignoring the outcome.
async fn delete_test_category(client: &Client, category_id: i64) {
    let base_url = base_url();
    let _ = client
        .delete(format!("{base_url}/api/service-categories/{category_id}"))
        .send()
        .await;
}

// ============================================================================
// Category Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_category_crud_lifecycle() {
    let client = Client::new();
    let base_url = base_url();

    let id = create_test_category(&client).await;

    // Read
    let resp = client
        .get(format!("{base_url}/api/service-categories/{id}"))
        .send()
        .await
        .expect("Failed to get category");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse category");
    assert_eq!(body["description"], "created by integration test");

    // Update
    let resp = client
        .put(format!("{base_url}/api/service-categories/{id}"))
        .json(&json!({ "name": body["name"], "description": "updated description" }))
        .send()
        .await
        .expect("Failed to update category");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse category");
    assert_eq!(body["description"], "updated description");

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/service-categories/{id}"))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/service-categories/{id}"))
        .send()
        .await
        .expect("Failed to get deleted category");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_category_validation() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/api/service-categories"))
        .json(&json!({ "name": " " }))
        .send()
        .await
        .expect("Failed to post invalid category");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    let errors = body["errors"].as_array().expect("Expected errors array");
    assert!(errors.iter().any(|e| e["field"] == "name"));
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_category_in_use_cannot_be_deleted() {
    let client = Client::new();
    let base_url = base_url();

    let category_id = create_test_category(&client).await;
    let resp = client
        .post(format!("{base_url}/api/service-types"))
        .json(&json!({
            "categoryId": category_id,
            "name": format!("Test Type {}", Uuid::new_v4())
        }))
        .send()
        .await
        .expect("Failed to create service type");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let service_type: Value = resp.json().await.expect("Failed to parse service type");
    let type_id = service_type["id"].as_i64().expect("Type id missing");

    // Blocked while the type exists
    let resp = client
        .delete(format!("{base_url}/api/service-categories/{category_id}"))
        .send()
        .await
        .expect("Failed to attempt category delete");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].is_string());

    // Remove the type, then the category goes through
    let resp = client
        .delete(format!("{base_url}/api/service-types/{type_id}"))
        .send()
        .await
        .expect("Failed to delete service type");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{base_url}/api/service-categories/{category_id}"))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// ============================================================================
// Service Type Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_type_crud_lifecycle() {
    let client = Client::new();
    let base_url = base_url();

    let category_id = create_test_category(&client).await;

    // Create with only the required fields; price and duration take defaults
    let type_name = format!("Test Type {}", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/service-types"))
        .json(&json!({ "categoryId": category_id, "name": type_name }))
        .send()
        .await
        .expect("Failed to create service type");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let service_type: Value = resp.json().await.expect("Failed to parse service type");
    let type_id = service_type["id"].as_i64().expect("Type id missing");
    assert_eq!(service_type["durationMinutes"], 30);
    let price: f64 = service_type["price"]
        .as_str()
        .expect("Expected price string")
        .parse()
        .expect("Price is not a number");
    assert!(price.abs() < f64::EPSILON);

    // Read: detail embeds the category
    let resp = client
        .get(format!("{base_url}/api/service-types/{type_id}"))
        .send()
        .await
        .expect("Failed to get service type");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse service type");
    assert_eq!(body["id"], type_id);
    assert_eq!(body["category"]["id"], category_id);

    // Update with an explicit price
    let resp = client
        .put(format!("{base_url}/api/service-types/{type_id}"))
        .json(&json!({
            "categoryId": category_id,
            "name": body["name"],
            "price": "75.00",
            "durationMinutes": 60
        }))
        .send()
        .await
        .expect("Failed to update service type");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse service type");
    assert_eq!(body["price"], "75.00");
    assert_eq!(body["durationMinutes"], 60);

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/service-types/{type_id}"))
        .send()
        .await
        .expect("Failed to delete service type");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    delete_test_category(&client, category_id).await;
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_type_requires_existing_category() {
    let client = Client::new();
    let base_url = base_url();

    // The category reference comes from the body, so this is a 400
    let resp = client
        .post(format!("{base_url}/api/service-types"))
        .json(&json!({ "categoryId": 999_999, "name": "Orphan Type" }))
        .send()
        .await
        .expect("Failed to post type for missing category");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_type_list_filters_by_category() {
    let client = Client::new();
    let base_url = base_url();

    let first_category = create_test_category(&client).await;
    let second_category = create_test_category(&client).await;

    let type_name = format!("Test Type {}", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/service-types"))
        .json(&json!({ "categoryId": first_category, "name": type_name }))
        .send()
        .await
        .expect("Failed to create service type");
    let service_type: Value = resp.json().await.expect("Failed to parse service type");
    let type_id = service_type["id"].as_i64().expect("Type id missing");

    // Filtered list contains our type and nothing from other categories
    let resp = client
        .get(format!(
            "{base_url}/api/service-types?categoryId={first_category}"
        ))
        .send()
        .await
        .expect("Failed to list filtered types");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse type list");
    let types = body.as_array().expect("Expected type array");
    assert!(types.iter().any(|t| t["id"] == type_id));
    assert!(types.iter().all(|t| t["categoryId"] == first_category));

    // The other category has no types yet
    let resp = client
        .get(format!(
            "{base_url}/api/service-types?categoryId={second_category}"
        ))
        .send()
        .await
        .expect("Failed to list filtered types");
    let body: Value = resp.json().await.expect("Failed to parse type list");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let _ = client
        .delete(format!("{base_url}/api/service-types/{type_id}"))
        .send()
        .await;
    delete_test_category(&client, first_category).await;
    delete_test_category(&client, second_category).await;
}
