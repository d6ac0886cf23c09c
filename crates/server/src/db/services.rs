//! Database operations for services and their attached images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_bloom_core::{CustomerId, ServiceId, ServiceImageId, ServiceTypeId};

use super::RepositoryError;
use crate::models::service::{Service, ServiceImage, ServiceInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for service queries.
#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i32,
    customer_id: i32,
    service_name: String,
    notes: Option<String>,
    staff_name: Option<String>,
    service_type_id: Option<i32>,
    price: Decimal,
    service_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: ServiceId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            service_name: row.service_name,
            notes: row.notes,
            staff_name: row.staff_name,
            service_type_id: row.service_type_id.map(ServiceTypeId::new),
            price: row.price,
            service_date: row.service_date,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for service image queries.
#[derive(Debug, sqlx::FromRow)]
struct ServiceImageRow {
    id: i32,
    service_id: i32,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<ServiceImageRow> for ServiceImage {
    fn from(row: ServiceImageRow) -> Self {
        Self {
            id: ServiceImageId::new(row.id),
            service_id: ServiceId::new(row.service_id),
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

/// Map a foreign-key violation on a service write to the row it points at.
fn map_service_fk_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        let message = match db_err.constraint() {
            Some("services_customer_id_fkey") => "Customer does not exist",
            Some("services_service_type_id_fkey") => "Service type does not exist",
            _ => "Referenced row does not exist",
        };
        return RepositoryError::InvalidReference(message.to_string());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for service and service-image database operations.
pub struct ServiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new service repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Service CRUD
    // =========================================================================

    /// List all services, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r"
            SELECT id, customer_id, service_name, notes, staff_name,
                   service_type_id, price, service_date, created_at
            FROM services
            ORDER BY service_date DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List one customer's services, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            r"
            SELECT id, customer_id, service_name, notes, staff_name,
                   service_type_id, price, service_date, created_at
            FROM services
            WHERE customer_id = $1
            ORDER BY service_date DESC, id DESC
            ",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a service by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r"
            SELECT id, customer_id, service_name, notes, staff_name,
                   service_type_id, price, service_date, created_at
            FROM services
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Record a new service. `service_date` defaults to now when not given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the customer or service
    /// type doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &ServiceInput) -> Result<Service, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r"
            INSERT INTO services (
                customer_id, service_name, notes, staff_name,
                service_type_id, price, service_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()))
            RETURNING id, customer_id, service_name, notes, staff_name,
                      service_type_id, price, service_date, created_at
            ",
        )
        .bind(input.customer_id)
        .bind(&input.service_name)
        .bind(&input.notes)
        .bind(&input.staff_name)
        .bind(input.service_type_id)
        .bind(input.price)
        .bind(input.service_date)
        .fetch_one(self.pool)
        .await
        .map_err(map_service_fk_violation)?;

        Ok(row.into())
    }

    /// Replace a service's fields. An absent `service_date` keeps the
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service doesn't exist.
    /// Returns `RepositoryError::InvalidReference` if the customer or service
    /// type doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ServiceId,
        input: &ServiceInput,
    ) -> Result<Service, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r"
            UPDATE services
            SET customer_id = $2, service_name = $3, notes = $4, staff_name = $5,
                service_type_id = $6, price = $7,
                service_date = COALESCE($8, service_date)
            WHERE id = $1
            RETURNING id, customer_id, service_name, notes, staff_name,
                      service_type_id, price, service_date, created_at
            ",
        )
        .bind(id)
        .bind(input.customer_id)
        .bind(&input.service_name)
        .bind(&input.notes)
        .bind(&input.staff_name)
        .bind(input.service_type_id)
        .bind(input.price)
        .bind(input.service_date)
        .fetch_optional(self.pool)
        .await
        .map_err(map_service_fk_violation)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a service and its images in one transaction.
    ///
    /// # Returns
    ///
    /// Returns `true` if the service was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn delete(&self, id: ServiceId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM service_images WHERE service_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM services WHERE id = $1")
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
    // Image CRUD
    // =========================================================================

    /// List a service's images, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_images(
        &self,
        service_id: ServiceId,
    ) -> Result<Vec<ServiceImage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceImageRow>(
            r"
            SELECT id, service_id, image_url, created_at
            FROM service_images
            WHERE service_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(service_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Attach an image to a service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the service doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_image(
        &self,
        service_id: ServiceId,
        image_url: &str,
    ) -> Result<ServiceImage, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceImageRow>(
            r"
            INSERT INTO service_images (service_id, image_url)
            VALUES ($1, $2)
            RETURNING id, service_id, image_url, created_at
            ",
        )
        .bind(service_id)
        .bind(image_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::InvalidReference("Service does not exist".to_string());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Delete an image.
    ///
    /// # Returns
    ///
    /// Returns `true` if the image was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_image(&self, id: ServiceImageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM service_images WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
