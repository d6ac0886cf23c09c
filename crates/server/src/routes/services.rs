//! Service history route handlers.
//!
//! CRUD for services plus the before/after image attachments.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use lotus_bloom_core::{CustomerId, ServiceId, ServiceImageId, ServiceTypeId};

use crate::db::{RepositoryError, ServiceRepository};
use crate::error::{AppError, FieldError};
use crate::models::service::{Service, ServiceImage, ServiceInput};
use crate::state::AppState;

/// Request body for creating or replacing a service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub customer_id: i32,
    pub service_name: String,
    pub notes: Option<String>,
    pub staff_name: Option<String>,
    pub service_type_id: Option<ServiceTypeId>,
    /// Accepts a decimal string or a bare number; missing means zero.
    pub price: Option<Decimal>,
    pub service_date: Option<DateTime<Utc>>,
}

impl ServiceRequest {
    fn validate(self) -> Result<ServiceInput, AppError> {
        let mut errors = Vec::new();

        let service_name = self.service_name.trim().to_owned();
        if service_name.chars().count() < 2 {
            errors.push(FieldError::new(
                "serviceName",
                "Service name must be at least 2 characters",
            ));
        }

        if self.customer_id < 1 {
            errors.push(FieldError::new("customerId", "Customer is required"));
        }

        let price = self.price.unwrap_or(Decimal::ZERO);
        if price.is_sign_negative() && !price.is_zero() {
            errors.push(FieldError::new("price", "Price cannot be negative"));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(ServiceInput {
            customer_id: CustomerId::new(self.customer_id),
            service_name,
            notes: self.notes.filter(|s| !s.trim().is_empty()),
            staff_name: self.staff_name.filter(|s| !s.trim().is_empty()),
            service_type_id: self.service_type_id,
            price,
            service_date: self.service_date,
        })
    }
}

/// Request body for attaching an image to a service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub image_url: String,
}

impl ImageRequest {
    fn validate(self) -> Result<String, AppError> {
        let url = self.image_url.trim().to_owned();
        if is_acceptable_image_url(&url) {
            Ok(url)
        } else {
            Err(AppError::Validation(vec![FieldError::new(
                "imageUrl",
                "Image URL must be an http(s) URL or a base64 data URL",
            )]))
        }
    }
}

/// Accept http(s) links and inline `data:image/...;base64,` payloads.
fn is_acceptable_image_url(url: &str) -> bool {
    if url.starts_with("data:image/") {
        return url.contains(";base64,");
    }
    url::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// List all services, most recent first.
///
/// GET /api/services
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Service>>, AppError> {
    let services = ServiceRepository::new(state.pool()).list().await?;

    Ok(Json(services))
}

/// Record a new service.
///
/// POST /api/services
///
/// # Errors
///
/// Returns 400 on validation failure or when the referenced customer or
/// service type does not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let input = req.validate()?;
    let service = ServiceRepository::new(state.pool()).create(&input).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

/// Replace a service's fields.
///
/// PUT /api/services/{id}
///
/// # Errors
///
/// Returns 404 if the service does not exist, 400 on validation failure or
/// a bad customer/service-type reference.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Json(req): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let input = req.validate()?;
    let service = ServiceRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(service))
}

/// Delete a service and its images.
///
/// DELETE /api/services/{id}
///
/// # Errors
///
/// Returns 404 if the service does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<StatusCode, AppError> {
    let deleted = ServiceRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Service".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List a service's images.
///
/// GET /api/services/{id}/images
///
/// # Errors
///
/// Returns 404 if the service does not exist.
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<Json<Vec<ServiceImage>>, AppError> {
    let repo = ServiceRepository::new(state.pool());
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service".to_string()))?;

    let images = repo.list_images(id).await?;

    Ok(Json(images))
}

/// Attach an image to a service.
///
/// POST /api/services/{id}/images
///
/// # Errors
///
/// Returns 404 if the service does not exist, 400 on an unacceptable URL.
pub async fn add_image(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Json(req): Json<ImageRequest>,
) -> Result<(StatusCode, Json<ServiceImage>), AppError> {
    let url = req.validate()?;

    // The service reference comes from the path here, so a missing service
    // is a 404 rather than the 400 a bad body reference would get.
    let image = ServiceRepository::new(state.pool())
        .add_image(id, &url)
        .await
        .map_err(|e| match e {
            RepositoryError::InvalidReference(_) => AppError::NotFound("Service".to_string()),
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(image)))
}

/// Delete an image.
///
/// DELETE /api/services/images/{id}
///
/// # Errors
///
/// Returns 404 if the image does not exist.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<ServiceImageId>,
) -> Result<StatusCode, AppError> {
    let deleted = ServiceRepository::new(state.pool()).delete_image(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Image".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_request() -> ServiceRequest {
        ServiceRequest {
            customer_id: 1,
            service_name: "Hair Coloring".to_string(),
            notes: None,
            staff_name: Some("Ashley Thompson".to_string()),
            service_type_id: Some(ServiceTypeId::new(3)),
            price: Some(Decimal::new(45_00, 2)),
            service_date: None,
        }
    }

    fn field_errors(err: AppError) -> Vec<FieldError> {
        match err {
            AppError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_converts_to_input() {
        let input = valid_request().validate().unwrap();
        assert_eq!(input.customer_id, CustomerId::new(1));
        assert_eq!(input.service_name, "Hair Coloring");
        assert_eq!(input.price, Decimal::new(45_00, 2));
        assert!(input.service_date.is_none());
    }

    #[test]
    fn test_short_service_name_rejected() {
        let mut req = valid_request();
        req.service_name = "X".to_string();
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "serviceName");
        assert_eq!(
            errors[0].message,
            "Service name must be at least 2 characters"
        );
    }

    #[test]
    fn test_zero_customer_id_rejected() {
        let mut req = valid_request();
        req.customer_id = 0;
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "customerId");
        assert_eq!(errors[0].message, "Customer is required");
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut req = valid_request();
        req.price = Some(Decimal::new(-100, 2));
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "price");
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let mut req = valid_request();
        req.price = None;
        let input = req.validate().unwrap();
        assert_eq!(input.price, Decimal::ZERO);
    }

    #[test]
    fn test_request_accepts_string_and_numeric_price() {
        let from_string: ServiceRequest = serde_json::from_value(serde_json::json!({
            "customerId": 1,
            "serviceName": "Manicure",
            "price": "150.00",
        }))
        .unwrap();
        assert_eq!(from_string.price, Some(Decimal::new(150_00, 2)));

        let from_number: ServiceRequest = serde_json::from_value(serde_json::json!({
            "customerId": 1,
            "serviceName": "Manicure",
            "price": 150,
        }))
        .unwrap();
        assert_eq!(from_number.price, Some(Decimal::new(150, 0)));
    }

    #[test]
    fn test_https_image_url_accepted() {
        assert!(is_acceptable_image_url("https://example.com/before.jpg"));
        assert!(is_acceptable_image_url("http://example.com/after.png"));
    }

    #[test]
    fn test_data_image_url_accepted() {
        assert!(is_acceptable_image_url(
            "data:image/jpeg;base64,/9j/4AAQSkZJRg=="
        ));
    }

    #[test]
    fn test_bad_image_urls_rejected() {
        assert!(!is_acceptable_image_url(""));
        assert!(!is_acceptable_image_url("not a url"));
        assert!(!is_acceptable_image_url("ftp://example.com/file.jpg"));
        assert!(!is_acceptable_image_url("javascript:alert(1)"));
        assert!(!is_acceptable_image_url("data:text/html;base64,PGh0bWw+"));
        assert!(!is_acceptable_image_url("data:image/png,rawbytes"));
    }

    #[test]
    fn test_image_request_trims_url() {
        let req = ImageRequest {
            image_url: "  https://example.com/before.jpg  ".to_string(),
        };
        assert_eq!(req.validate().unwrap(), "https://example.com/before.jpg");
    }
}
