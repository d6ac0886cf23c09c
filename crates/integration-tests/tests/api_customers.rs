//! Integration tests for customer management.
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

/// Test helper: Create a customer with a unique name, returning the body.
async fn create_test_customer(client: &Client) -> Value {
    let base_url = base_url();
    let name = format!("Test Customer {}", Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/api/customers"))
        .json(&json!({
            "name": name,
            "phone": "(555) 000-1234",
            "notes": "created by integration test"
        }))
        .send()
        .await
        .expect("Failed to create test customer");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse customer")
}

/// Test helper: Record a service for a customer on a fixed date.
async fn create_test_service(client: &Client, customer_id: i64, name: &str, date: &str) -> Value {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/services"))
        .json(&json!({
            "customerId": customer_id,
            "serviceName": name,
            "price": "50.00",
            "serviceDate": date
        }))
        .send()
        .await
        .expect("Failed to create test service");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse service")
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
async fn test_customer_crud_lifecycle() {
    let client = Client::new();
    let base_url = base_url();

    // Create
    let customer = create_test_customer(&client).await;
    let id = customer["id"].as_i64().expect("Customer id missing");
    assert_eq!(customer["phone"], "(555) 000-1234");
    assert!(customer["createdAt"].is_string());

    // Read: detail includes a visit count, zero for a new customer
    let resp = client
        .get(format!("{base_url}/api/customers/{id}"))
        .send()
        .await
        .expect("Failed to get customer");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse customer");
    assert_eq!(body["id"], customer["id"]);
    assert_eq!(body["visitCount"], 0);

    // Update: replace with new notes and address
    let resp = client
        .put(format!("{base_url}/api/customers/{id}"))
        .json(&json!({
            "name": customer["name"],
            "phone": "(555) 000-9999",
            "address": "12 Orchid Lane",
            "notes": "updated by integration test"
        }))
        .send()
        .await
        .expect("Failed to update customer");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse customer");
    assert_eq!(body["phone"], "(555) 000-9999");
    assert_eq!(body["address"], "12 Orchid Lane");

    // Delete
    let resp = client
        .delete(format!("{base_url}/api/customers/{id}"))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone
    let resp = client
        .get(format!("{base_url}/api/customers/{id}"))
        .send()
        .await
        .expect("Failed to get deleted customer");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_customer_create_validation() {
    let client = Client::new();
    let base_url = base_url();

    // One-character name and an undialable phone
    let resp = client
        .post(format!("{base_url}/api/customers"))
        .json(&json!({
            "name": "A",
            "phone": "call me"
        }))
        .send()
        .await
        .expect("Failed to post invalid customer");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    let errors = body["errors"].as_array().expect("Expected errors array");
    assert!(errors.iter().any(|e| e["field"] == "name"));
    assert!(errors.iter().any(|e| e["field"] == "phone"));
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_customer_missing_returns_not_found() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/customers/999999"))
        .send()
        .await
        .expect("Failed to get missing customer");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    let message = body["error"].as_str().expect("Expected error message");
    assert!(message.contains("not found"));
}

// ============================================================================
// List & Summary Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_customer_list_includes_new_customer() {
    let client = Client::new();
    let base_url = base_url();

    let customer = create_test_customer(&client).await;
    let id = customer["id"].as_i64().expect("Customer id missing");

    let resp = client
        .get(format!("{base_url}/api/customers"))
        .send()
        .await
        .expect("Failed to list customers");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse customer list");
    let customers = body.as_array().expect("Expected customer array");
    let entry = customers
        .iter()
        .find(|c| c["id"] == customer["id"])
        .expect("New customer missing from list");
    assert_eq!(entry["visitCount"], 0);
    assert!(entry["lastVisit"].is_null());
    assert!(entry["lastService"].is_null());

    delete_test_customer(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_summary_is_zeroed_for_unknown_customer() {
    let client = Client::new();
    let base_url = base_url();

    // The summary endpoint never 404s; unknown ids get an empty summary
    let resp = client
        .get(format!("{base_url}/api/customers/999999/summary"))
        .send()
        .await
        .expect("Failed to get summary");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse summary");
    assert_eq!(body["totalVisits"], 0);
    assert!(body["firstVisit"].is_null());
    assert!(body["lastVisit"].is_null());
    assert!(body["favoriteService"].is_null());
}

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_summary_reflects_service_history() {
    let client = Client::new();
    let base_url = base_url();

    let customer = create_test_customer(&client).await;
    let id = customer["id"].as_i64().expect("Customer id missing");

    // Two haircuts and one massage on distinct dates
    create_test_service(&client, id, "Haircut", "2001-03-10T00:00:00Z").await;
    create_test_service(&client, id, "Massage", "2001-04-02T00:00:00Z").await;
    create_test_service(&client, id, "Haircut", "2001-05-20T00:00:00Z").await;

    let resp = client
        .get(format!("{base_url}/api/customers/{id}/summary"))
        .send()
        .await
        .expect("Failed to get summary");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse summary");
    assert_eq!(body["totalVisits"], 3);
    assert_eq!(body["favoriteService"], "Haircut");
    let first = body["firstVisit"].as_str().expect("firstVisit missing");
    let last = body["lastVisit"].as_str().expect("lastVisit missing");
    assert!(first.starts_with("2001-03-10"));
    assert!(last.starts_with("2001-05-20"));

    // History is returned newest first
    let resp = client
        .get(format!("{base_url}/api/customers/{id}/services"))
        .send()
        .await
        .expect("Failed to get service history");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse history");
    let services = body.as_array().expect("Expected service array");
    assert_eq!(services.len(), 3);
    let newest = services
        .first()
        .and_then(|s| s["serviceDate"].as_str())
        .expect("serviceDate missing");
    assert!(newest.starts_with("2001-05-20"));

    delete_test_customer(&client, id).await;
}

// ============================================================================
// Cascade Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running salon server and database"]
async fn test_deleting_customer_cascades_to_services() {
    let client = Client::new();
    let base_url = base_url();

    let customer = create_test_customer(&client).await;
    let id = customer["id"].as_i64().expect("Customer id missing");
    let service = create_test_service(&client, id, "Haircut", "2001-06-01T00:00:00Z").await;
    let service_id = service["id"].as_i64().expect("Service id missing");

    let resp = client
        .delete(format!("{base_url}/api/customers/{id}"))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The service went with the customer: deleting it again is a 404
    let resp = client
        .delete(format!("{base_url}/api/services/{service_id}"))
        .send()
        .await
        .expect("Failed to delete orphaned service");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // And the history endpoint no longer knows the customer
    let resp = client
        .get(format!("{base_url}/api/customers/{id}/services"))
        .send()
        .await
        .expect("Failed to get history for deleted customer");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
