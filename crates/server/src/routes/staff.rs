//! Staff roster route handlers.
//!
//! Staff CRUD plus the service-type assignment endpoints backing the
//! scheduling screen.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use lotus_bloom_core::{AssignmentId, PhoneNumber, ServiceTypeId, StaffMemberId};

use crate::db::StaffRepository;
use crate::error::{AppError, FieldError};
use crate::models::staff::{ServiceAssignment, StaffInput, StaffMember, StaffWithAssignments};
use crate::state::AppState;

/// Request body for creating or replacing a staff member.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRequest {
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl StaffRequest {
    fn validate(self) -> Result<StaffInput, AppError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_owned();
        if name.chars().count() < 2 {
            errors.push(FieldError::new(
                "name",
                "Name must be at least 2 characters",
            ));
        }

        let role = self.role.trim().to_owned();
        if role.is_empty() {
            errors.push(FieldError::new("role", "Role is required"));
        }

        let phone = match self.phone.filter(|s| !s.trim().is_empty()) {
            Some(raw) => match PhoneNumber::parse(&raw) {
                Ok(phone) => Some(phone),
                Err(e) => {
                    errors.push(FieldError::new("phone", e.to_string()));
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(StaffInput {
            name,
            role,
            phone,
            email: self.email.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// List all staff members, alphabetically.
///
/// GET /api/staff
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<StaffMember>>, AppError> {
    let staff = StaffRepository::new(state.pool()).list().await?;

    Ok(Json(staff))
}

/// Add a staff member.
///
/// POST /api/staff
///
/// # Errors
///
/// Returns 400 on validation failure.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<StaffRequest>,
) -> Result<(StatusCode, Json<StaffMember>), AppError> {
    let input = req.validate()?;
    let member = StaffRepository::new(state.pool()).create(&input).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Get a staff member with their service assignments.
///
/// GET /api/staff/{id}
///
/// # Errors
///
/// Returns 404 if the staff member does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<StaffMemberId>,
) -> Result<Json<StaffWithAssignments>, AppError> {
    let member = StaffRepository::new(state.pool())
        .get_with_assignments(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member".to_string()))?;

    Ok(Json(member))
}

/// Replace a staff member's mutable fields.
///
/// PUT /api/staff/{id}
///
/// # Errors
///
/// Returns 404 if the staff member does not exist, 400 on validation
/// failure.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<StaffMemberId>,
    Json(req): Json<StaffRequest>,
) -> Result<Json<StaffMember>, AppError> {
    let input = req.validate()?;
    let member = StaffRepository::new(state.pool()).update(id, &input).await?;

    Ok(Json(member))
}

/// Delete a staff member and their assignments.
///
/// DELETE /api/staff/{id}
///
/// # Errors
///
/// Returns 404 if the staff member does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<StaffMemberId>,
) -> Result<StatusCode, AppError> {
    let deleted = StaffRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Staff member".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Assign a service type to a staff member.
///
/// POST /api/staff/{staffId}/services/{serviceTypeId}
///
/// # Errors
///
/// Returns 409 if the assignment already exists, 400 if either side of the
/// assignment does not exist.
pub async fn assign(
    State(state): State<AppState>,
    Path((staff_id, service_type_id)): Path<(StaffMemberId, ServiceTypeId)>,
) -> Result<(StatusCode, Json<ServiceAssignment>), AppError> {
    let assignment = StaffRepository::new(state.pool())
        .assign(staff_id, service_type_id)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Remove an assignment.
///
/// DELETE /api/staff/assignments/{id}
///
/// # Errors
///
/// Returns 404 if the assignment does not exist.
pub async fn unassign(
    State(state): State<AppState>,
    Path(id): Path<AssignmentId>,
) -> Result<StatusCode, AppError> {
    let deleted = StaffRepository::new(state.pool()).unassign(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Assignment".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
