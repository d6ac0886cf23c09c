//! Database operations for the staff roster and service assignments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_bloom_core::{
    AssignmentId, PhoneNumber, ServiceCategoryId, ServiceTypeId, StaffMemberId,
};

use super::RepositoryError;
use crate::models::catalog::{ServiceCategory, ServiceType, ServiceTypeWithCategory};
use crate::models::staff::{
    AssignmentDetail, ServiceAssignment, StaffInput, StaffMember, StaffWithAssignments,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for staff queries.
#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: i32,
    name: String,
    role: String,
    phone: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StaffRow> for StaffMember {
    type Error = RepositoryError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let phone = row
            .phone
            .as_deref()
            .map(PhoneNumber::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
            })?;

        Ok(Self {
            id: StaffMemberId::new(row.id),
            name: row.name,
            role: row.role,
            phone,
            email: row.email,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for assignment rows.
#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: i32,
    staff_id: i32,
    service_type_id: i32,
    created_at: DateTime<Utc>,
}

impl From<AssignmentRow> for ServiceAssignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: AssignmentId::new(row.id),
            staff_id: StaffMemberId::new(row.staff_id),
            service_type_id: ServiceTypeId::new(row.service_type_id),
            created_at: row.created_at,
        }
    }
}

/// Internal row type for an assignment joined to its type and category.
#[derive(Debug, sqlx::FromRow)]
struct AssignmentDetailRow {
    assignment_id: i32,
    type_id: i32,
    type_category_id: i32,
    type_name: String,
    type_description: Option<String>,
    type_price: Decimal,
    type_duration_minutes: i32,
    type_created_at: DateTime<Utc>,
    category_id: i32,
    category_name: String,
    category_description: Option<String>,
    category_created_at: DateTime<Utc>,
}

impl From<AssignmentDetailRow> for AssignmentDetail {
    fn from(row: AssignmentDetailRow) -> Self {
        Self {
            id: AssignmentId::new(row.assignment_id),
            service_type_id: ServiceTypeId::new(row.type_id),
            service_type: ServiceTypeWithCategory {
                service_type: ServiceType {
                    id: ServiceTypeId::new(row.type_id),
                    category_id: ServiceCategoryId::new(row.type_category_id),
                    name: row.type_name,
                    description: row.type_description,
                    price: row.type_price,
                    duration_minutes: row.type_duration_minutes,
                    created_at: row.type_created_at,
                },
                category: ServiceCategory {
                    id: ServiceCategoryId::new(row.category_id),
                    name: row.category_name,
                    description: row.category_description,
                    created_at: row.category_created_at,
                },
            },
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for staff database operations.
pub struct StaffRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffRepository<'a> {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Staff CRUD
    // =========================================================================

    /// List all staff members in name order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored phone number is invalid.
    pub async fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, StaffRow>(
            r"
            SELECT id, name, role, phone, email, created_at
            FROM staff_members
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored phone number is invalid.
    pub async fn get(&self, id: StaffMemberId) -> Result<Option<StaffMember>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(
            r"
            SELECT id, name, role, phone, email, created_at
            FROM staff_members
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a staff member with their service assignments embedded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored phone number is invalid.
    pub async fn get_with_assignments(
        &self,
        id: StaffMemberId,
    ) -> Result<Option<StaffWithAssignments>, RepositoryError> {
        let Some(staff) = self.get(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, AssignmentDetailRow>(
            r"
            SELECT
                a.id AS assignment_id,
                t.id AS type_id,
                t.category_id AS type_category_id,
                t.name AS type_name,
                t.description AS type_description,
                t.price AS type_price,
                t.duration_minutes AS type_duration_minutes,
                t.created_at AS type_created_at,
                c.id AS category_id,
                c.name AS category_name,
                c.description AS category_description,
                c.created_at AS category_created_at
            FROM staff_service_assignments a
            INNER JOIN service_types t ON t.id = a.service_type_id
            INNER JOIN service_categories c ON c.id = t.category_id
            WHERE a.staff_id = $1
            ORDER BY c.name ASC, t.name ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(StaffWithAssignments {
            staff,
            service_assignments: rows.into_iter().map(Into::into).collect(),
        }))
    }

    /// Add a staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &StaffInput) -> Result<StaffMember, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(
            r"
            INSERT INTO staff_members (name, role, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, role, phone, email, created_at
            ",
        )
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace a staff member's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the staff member doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: StaffMemberId,
        input: &StaffInput,
    ) -> Result<StaffMember, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(
            r"
            UPDATE staff_members
            SET name = $2, role = $3, phone = $4, email = $5
            WHERE id = $1
            RETURNING id, name, role, phone, email, created_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a staff member and their assignments in one transaction.
    ///
    /// # Returns
    ///
    /// Returns `true` if the member was deleted, `false` if they didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn delete(&self, id: StaffMemberId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM staff_service_assignments WHERE staff_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM staff_members WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    /// Assign a service type to a staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the assignment already exists.
    /// Returns `RepositoryError::InvalidReference` if the staff member or
    /// service type doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn assign(
        &self,
        staff_id: StaffMemberId,
        service_type_id: ServiceTypeId,
    ) -> Result<ServiceAssignment, RepositoryError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r"
            INSERT INTO staff_service_assignments (staff_id, service_type_id)
            VALUES ($1, $2)
            RETURNING id, staff_id, service_type_id, created_at
            ",
        )
        .bind(staff_id)
        .bind(service_type_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict(
                        "Staff member is already assigned to this service type".to_string(),
                    );
                }
                if db_err.is_foreign_key_violation() {
                    let message = match db_err.constraint() {
                        Some("staff_service_assignments_staff_id_fkey") => {
                            "Staff member does not exist"
                        }
                        Some("staff_service_assignments_service_type_id_fkey") => {
                            "Service type does not exist"
                        }
                        _ => "Referenced row does not exist",
                    };
                    return RepositoryError::InvalidReference(message.to_string());
                }
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Remove an assignment.
    ///
    /// # Returns
    ///
    /// Returns `true` if the assignment was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unassign(&self, id: AssignmentId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM staff_service_assignments WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
