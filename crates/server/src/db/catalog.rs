//! Database operations for the service catalog (categories and types).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_bloom_core::{ServiceCategoryId, ServiceTypeId};

use super::RepositoryError;
use crate::models::catalog::{
    CategoryInput, ServiceCategory, ServiceType, ServiceTypeInput, ServiceTypeWithCategory,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for ServiceCategory {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: ServiceCategoryId::new(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for service type queries.
#[derive(Debug, sqlx::FromRow)]
struct TypeRow {
    id: i32,
    category_id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    duration_minutes: i32,
    created_at: DateTime<Utc>,
}

impl From<TypeRow> for ServiceType {
    fn from(row: TypeRow) -> Self {
        Self {
            id: ServiceTypeId::new(row.id),
            category_id: ServiceCategoryId::new(row.category_id),
            name: row.name,
            description: row.description,
            price: row.price,
            duration_minutes: row.duration_minutes,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for a service type joined to its category.
#[derive(Debug, sqlx::FromRow)]
struct TypeWithCategoryRow {
    id: i32,
    category_id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    duration_minutes: i32,
    created_at: DateTime<Utc>,
    category_name: String,
    category_description: Option<String>,
    category_created_at: DateTime<Utc>,
}

impl From<TypeWithCategoryRow> for ServiceTypeWithCategory {
    fn from(row: TypeWithCategoryRow) -> Self {
        Self {
            service_type: ServiceType {
                id: ServiceTypeId::new(row.id),
                category_id: ServiceCategoryId::new(row.category_id),
                name: row.name,
                description: row.description,
                price: row.price,
                duration_minutes: row.duration_minutes,
                created_at: row.created_at,
            },
            category: ServiceCategory {
                id: ServiceCategoryId::new(row.category_id),
                name: row.category_name,
                description: row.category_description,
                created_at: row.category_created_at,
            },
        }
    }
}

/// Internal row type for the in-use check before deleting a type.
#[derive(Debug, sqlx::FromRow)]
struct TypeUsageRow {
    service_count: i64,
    assignment_count: i64,
}

fn map_type_fk_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::InvalidReference("Service category does not exist".to_string());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories in name order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<ServiceCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, created_at
            FROM service_categories
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category(
        &self,
        id: ServiceCategoryId,
    ) -> Result<Option<ServiceCategory>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, description, created_at
            FROM service_categories
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_category(
        &self,
        input: &CategoryInput,
    ) -> Result<ServiceCategory, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO service_categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_category(
        &self,
        id: ServiceCategoryId,
        input: &CategoryInput,
    ) -> Result<ServiceCategory, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE service_categories
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, created_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a category that no service types reference.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if service types still reference the
    /// category.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_category(&self, id: ServiceCategoryId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let type_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM service_types WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if type_count > 0 {
            return Err(RepositoryError::InUse(
                "Cannot delete a category that still has service types".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM service_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // A type created between the check and the delete trips the FK
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::InUse(
                        "Cannot delete a category that still has service types".to_string(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    // =========================================================================
    // Service types
    // =========================================================================

    /// List all service types with their categories embedded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_types(&self) -> Result<Vec<ServiceTypeWithCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, TypeWithCategoryRow>(
            r"
            SELECT
                t.id, t.category_id, t.name, t.description, t.price,
                t.duration_minutes, t.created_at,
                c.name AS category_name,
                c.description AS category_description,
                c.created_at AS category_created_at
            FROM service_types t
            INNER JOIN service_categories c ON c.id = t.category_id
            ORDER BY c.name ASC, t.name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List the service types in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_types_for_category(
        &self,
        category_id: ServiceCategoryId,
    ) -> Result<Vec<ServiceTypeWithCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, TypeWithCategoryRow>(
            r"
            SELECT
                t.id, t.category_id, t.name, t.description, t.price,
                t.duration_minutes, t.created_at,
                c.name AS category_name,
                c.description AS category_description,
                c.created_at AS category_created_at
            FROM service_types t
            INNER JOIN service_categories c ON c.id = t.category_id
            WHERE t.category_id = $1
            ORDER BY t.name ASC
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a service type with its category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_type(
        &self,
        id: ServiceTypeId,
    ) -> Result<Option<ServiceTypeWithCategory>, RepositoryError> {
        let row = sqlx::query_as::<_, TypeWithCategoryRow>(
            r"
            SELECT
                t.id, t.category_id, t.name, t.description, t.price,
                t.duration_minutes, t.created_at,
                c.name AS category_name,
                c.description AS category_description,
                c.created_at AS category_created_at
            FROM service_types t
            INNER JOIN service_categories c ON c.id = t.category_id
            WHERE t.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new service type.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_type(
        &self,
        input: &ServiceTypeInput,
    ) -> Result<ServiceType, RepositoryError> {
        let row = sqlx::query_as::<_, TypeRow>(
            r"
            INSERT INTO service_types (category_id, name, description, price, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, category_id, name, description, price, duration_minutes, created_at
            ",
        )
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.duration_minutes)
        .fetch_one(self.pool)
        .await
        .map_err(map_type_fk_violation)?;

        Ok(row.into())
    }

    /// Replace a service type's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the type doesn't exist.
    /// Returns `RepositoryError::InvalidReference` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_type(
        &self,
        id: ServiceTypeId,
        input: &ServiceTypeInput,
    ) -> Result<ServiceType, RepositoryError> {
        let row = sqlx::query_as::<_, TypeRow>(
            r"
            UPDATE service_types
            SET category_id = $2, name = $3, description = $4,
                price = $5, duration_minutes = $6
            WHERE id = $1
            RETURNING id, category_id, name, description, price, duration_minutes, created_at
            ",
        )
        .bind(id)
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.duration_minutes)
        .fetch_optional(self.pool)
        .await
        .map_err(map_type_fk_violation)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a service type that nothing references.
    ///
    /// # Returns
    ///
    /// Returns `true` if the type was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InUse` if services or staff assignments still
    /// reference the type.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_type(&self, id: ServiceTypeId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let usage = sqlx::query_as::<_, TypeUsageRow>(
            r"
            SELECT
                (SELECT COUNT(*) FROM services WHERE service_type_id = $1) AS service_count,
                (SELECT COUNT(*) FROM staff_service_assignments WHERE service_type_id = $1)
                    AS assignment_count
            ",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if usage.service_count > 0 {
            return Err(RepositoryError::InUse(
                "Cannot delete a service type with recorded services".to_string(),
            ));
        }
        if usage.assignment_count > 0 {
            return Err(RepositoryError::InUse(
                "Cannot delete a service type that is assigned to staff".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM service_types WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::InUse(
                        "Cannot delete a service type that is still referenced".to_string(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
