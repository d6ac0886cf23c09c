//! Customer route handlers.
//!
//! JSON API endpoints for the customer list, detail, summary, and service
//! history views.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use lotus_bloom_core::{CustomerId, PhoneNumber};

use crate::db::{CustomerRepository, ServiceRepository};
use crate::error::{AppError, FieldError};
use crate::models::customer::{
    Customer, CustomerInput, CustomerSummary, CustomerWithSummary, CustomerWithVisitCount,
};
use crate::models::service::Service;
use crate::state::AppState;

/// Request body for creating or replacing a customer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub phone: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl CustomerRequest {
    /// Validate the request and convert it into a repository input.
    fn validate(self) -> Result<CustomerInput, AppError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_owned();
        if name.chars().count() < 2 {
            errors.push(FieldError::new(
                "name",
                "Name must be at least 2 characters",
            ));
        }

        let phone = match PhoneNumber::parse(&self.phone) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.push(FieldError::new("phone", e.to_string()));
                None
            }
        };

        match phone {
            Some(phone) if errors.is_empty() => Ok(CustomerInput {
                name,
                phone,
                birthdate: self.birthdate,
                address: none_if_blank(self.address),
                notes: none_if_blank(self.notes),
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Treat blank optional strings as absent so the database stays NULL-clean.
fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// List all customers with their visit summaries.
///
/// GET /api/customers
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerWithSummary>>, AppError> {
    let customers = CustomerRepository::new(state.pool())
        .list_with_summary()
        .await?;

    Ok(Json(customers))
}

/// Create a new customer.
///
/// POST /api/customers
///
/// # Errors
///
/// Returns a 400 validation error for a short name or undialable phone
/// number.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let input = req.validate()?;
    let customer = CustomerRepository::new(state.pool()).create(&input).await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Get a customer with their visit count.
///
/// GET /api/customers/{id}
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerWithVisitCount>, AppError> {
    let customer = CustomerRepository::new(state.pool())
        .get_with_visit_count(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

    Ok(Json(customer))
}

/// Replace a customer's mutable fields.
///
/// PUT /api/customers/{id}
///
/// # Errors
///
/// Returns 404 if the customer does not exist, 400 on validation failure.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let input = req.validate()?;
    let customer = CustomerRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(customer))
}

/// Delete a customer and their service history.
///
/// DELETE /api/customers/{id}
///
/// Removes the customer's service images, services, and finally the customer
/// row, all in one transaction.
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode, AppError> {
    let deleted = CustomerRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Customer".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate a customer's visit history.
///
/// GET /api/customers/{id}/summary
///
/// An unknown customer ID yields the empty summary (zero visits, nulls)
/// rather than 404; the detail page requests this before the customer fetch
/// resolves.
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerSummary>, AppError> {
    let summary = CustomerRepository::new(state.pool()).summary(id).await?;

    Ok(Json(summary))
}

/// List a customer's services, most recent first.
///
/// GET /api/customers/{id}/services
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn services(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Vec<Service>>, AppError> {
    CustomerRepository::new(state.pool())
        .get_with_visit_count(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

    let services = ServiceRepository::new(state.pool())
        .list_for_customer(id)
        .await?;

    Ok(Json(services))
}
