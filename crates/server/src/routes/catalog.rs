//! Service catalog route handlers.
//!
//! Categories and priced service types. Deletes are blocked while other
//! rows still reference the target.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use lotus_bloom_core::{ServiceCategoryId, ServiceTypeId};

use crate::db::CatalogRepository;
use crate::error::{AppError, FieldError};
use crate::models::catalog::{
    CategoryInput, ServiceCategory, ServiceType, ServiceTypeInput, ServiceTypeWithCategory,
};
use crate::state::AppState;

/// Request body for creating or replacing a category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    fn validate(self) -> Result<CategoryInput, AppError> {
        let name = self.name.trim().to_owned();
        if name.chars().count() < 2 {
            return Err(AppError::Validation(vec![FieldError::new(
                "name",
                "Name must be at least 2 characters",
            )]));
        }

        Ok(CategoryInput {
            name,
            description: self.description.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Request body for creating or replacing a service type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeRequest {
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Accepts a decimal string or a bare number; missing means zero.
    pub price: Option<Decimal>,
    pub duration_minutes: Option<i32>,
}

impl ServiceTypeRequest {
    fn validate(self) -> Result<ServiceTypeInput, AppError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_owned();
        if name.chars().count() < 2 {
            errors.push(FieldError::new(
                "name",
                "Name must be at least 2 characters",
            ));
        }

        if self.category_id < 1 {
            errors.push(FieldError::new("categoryId", "Category is required"));
        }

        let price = self.price.unwrap_or(Decimal::ZERO);
        if price.is_sign_negative() && !price.is_zero() {
            errors.push(FieldError::new("price", "Price cannot be negative"));
        }

        let duration_minutes = self.duration_minutes.unwrap_or(30);
        if duration_minutes < 1 {
            errors.push(FieldError::new(
                "durationMinutes",
                "Duration must be at least 1 minute",
            ));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(ServiceTypeInput {
            category_id: ServiceCategoryId::new(self.category_id),
            name,
            description: self.description.filter(|s| !s.trim().is_empty()),
            price,
            duration_minutes,
        })
    }
}

/// Optional `?categoryId=` filter for the service type list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeListQuery {
    pub category_id: Option<ServiceCategoryId>,
}

/// List all categories, alphabetically.
///
/// GET /api/service-categories
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceCategory>>, AppError> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;

    Ok(Json(categories))
}

/// Create a category.
///
/// POST /api/service-categories
///
/// # Errors
///
/// Returns 400 on validation failure.
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<ServiceCategory>), AppError> {
    let input = req.validate()?;
    let category = CatalogRepository::new(state.pool())
        .create_category(&input)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by ID.
///
/// GET /api/service-categories/{id}
///
/// # Errors
///
/// Returns 404 if the category does not exist.
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<ServiceCategoryId>,
) -> Result<Json<ServiceCategory>, AppError> {
    let category = CatalogRepository::new(state.pool())
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service category".to_string()))?;

    Ok(Json(category))
}

/// Replace a category's fields.
///
/// PUT /api/service-categories/{id}
///
/// # Errors
///
/// Returns 404 if the category does not exist, 400 on validation failure.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<ServiceCategoryId>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<ServiceCategory>, AppError> {
    let input = req.validate()?;
    let category = CatalogRepository::new(state.pool())
        .update_category(id, &input)
        .await?;

    Ok(Json(category))
}

/// Delete a category with no service types.
///
/// DELETE /api/service-categories/{id}
///
/// # Errors
///
/// Returns 404 if the category does not exist, 400 while service types
/// still reference it.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<ServiceCategoryId>,
) -> Result<StatusCode, AppError> {
    let deleted = CatalogRepository::new(state.pool())
        .delete_category(id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Service category".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List service types, optionally filtered by category.
///
/// GET /api/service-types[?categoryId={id}]
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn list_types(
    State(state): State<AppState>,
    Query(query): Query<TypeListQuery>,
) -> Result<Json<Vec<ServiceTypeWithCategory>>, AppError> {
    let repo = CatalogRepository::new(state.pool());
    let types = match query.category_id {
        Some(category_id) => repo.list_types_for_category(category_id).await?,
        None => repo.list_types().await?,
    };

    Ok(Json(types))
}

/// Create a service type.
///
/// POST /api/service-types
///
/// # Errors
///
/// Returns 400 on validation failure or when the category does not exist.
pub async fn create_type(
    State(state): State<AppState>,
    Json(req): Json<ServiceTypeRequest>,
) -> Result<(StatusCode, Json<ServiceType>), AppError> {
    let input = req.validate()?;
    let service_type = CatalogRepository::new(state.pool())
        .create_type(&input)
        .await?;

    Ok((StatusCode::CREATED, Json(service_type)))
}

/// Get a service type with its category.
///
/// GET /api/service-types/{id}
///
/// # Errors
///
/// Returns 404 if the service type does not exist.
pub async fn get_type(
    State(state): State<AppState>,
    Path(id): Path<ServiceTypeId>,
) -> Result<Json<ServiceTypeWithCategory>, AppError> {
    let service_type = CatalogRepository::new(state.pool())
        .get_type(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service type".to_string()))?;

    Ok(Json(service_type))
}

/// Replace a service type's fields.
///
/// PUT /api/service-types/{id}
///
/// # Errors
///
/// Returns 404 if the service type does not exist, 400 on validation
/// failure or when the category does not exist.
pub async fn update_type(
    State(state): State<AppState>,
    Path(id): Path<ServiceTypeId>,
    Json(req): Json<ServiceTypeRequest>,
) -> Result<Json<ServiceType>, AppError> {
    let input = req.validate()?;
    let service_type = CatalogRepository::new(state.pool())
        .update_type(id, &input)
        .await?;

    Ok(Json(service_type))
}

/// Delete a service type that nothing references.
///
/// DELETE /api/service-types/{id}
///
/// # Errors
///
/// Returns 404 if the service type does not exist, 400 while services or
/// assignments still reference it.
pub async fn delete_type(
    State(state): State<AppState>,
    Path(id): Path<ServiceTypeId>,
) -> Result<StatusCode, AppError> {
    let deleted = CatalogRepository::new(state.pool()).delete_type(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Service type".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_type_request() -> ServiceTypeRequest {
        ServiceTypeRequest {
            category_id: 1,
            name: "Hair Coloring".to_string(),
            description: Some("Full color treatment".to_string()),
            price: Some(Decimal::new(450_00, 2)),
            duration_minutes: Some(90),
        }
    }

    fn field_errors(err: AppError) -> Vec<FieldError> {
        match err {
            AppError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_category_name_is_trimmed() {
        let req = CategoryRequest {
            name: " Spa ".to_string(),
            description: None,
        };
        let input = req.validate().unwrap();
        assert_eq!(input.name, "Spa");
    }

    #[test]
    fn test_short_category_name_rejected() {
        let req = CategoryRequest {
            name: "H".to_string(),
            description: None,
        };
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn test_valid_type_request_converts_to_input() {
        let input = valid_type_request().validate().unwrap();
        assert_eq!(input.category_id, ServiceCategoryId::new(1));
        assert_eq!(input.price, Decimal::new(450_00, 2));
        assert_eq!(input.duration_minutes, 90);
    }

    #[test]
    fn test_type_defaults_match_the_schema() {
        let mut req = valid_type_request();
        req.price = None;
        req.duration_minutes = None;
        let input = req.validate().unwrap();
        assert_eq!(input.price, Decimal::ZERO);
        assert_eq!(input.duration_minutes, 30);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut req = valid_type_request();
        req.duration_minutes = Some(0);
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "durationMinutes");
    }

    #[test]
    fn test_zero_category_id_rejected() {
        let mut req = valid_type_request();
        req.category_id = 0;
        let errors = field_errors(req.validate().unwrap_err());
        assert_eq!(errors[0].field, "categoryId");
        assert_eq!(errors[0].message, "Category is required");
    }

    #[test]
    fn test_type_list_query_accepts_camel_case() {
        let query: TypeListQuery =
            serde_json::from_value(serde_json::json!({ "categoryId": 2 })).unwrap();
        assert_eq!(query.category_id, Some(ServiceCategoryId::new(2)));
    }
}
