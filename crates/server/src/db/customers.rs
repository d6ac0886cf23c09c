//! Database operations for customers and their visit aggregates.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_bloom_core::{CustomerId, PhoneNumber, ServiceId, ServiceTypeId};

use super::RepositoryError;
use crate::models::customer::{
    Customer, CustomerInput, CustomerSummary, CustomerWithSummary, CustomerWithVisitCount,
};
use crate::models::service::Service;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    name: String,
    phone: String,
    birthdate: Option<NaiveDate>,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let phone = PhoneNumber::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            phone,
            birthdate: row.birthdate,
            address: row.address,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for the customer list with its lateral aggregates.
///
/// The `last_*` columns come from a `LEFT JOIN LATERAL` picking the most
/// recent service, so they are all nullable together.
#[derive(Debug, sqlx::FromRow)]
struct CustomerWithSummaryRow {
    id: i32,
    name: String,
    phone: String,
    birthdate: Option<NaiveDate>,
    address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    visit_count: i64,
    last_service_id: Option<i32>,
    last_service_name: Option<String>,
    last_service_notes: Option<String>,
    last_staff_name: Option<String>,
    last_service_type_id: Option<i32>,
    last_price: Option<Decimal>,
    last_service_date: Option<DateTime<Utc>>,
    last_service_created_at: Option<DateTime<Utc>>,
}

impl TryFrom<CustomerWithSummaryRow> for CustomerWithSummary {
    type Error = RepositoryError;

    fn try_from(row: CustomerWithSummaryRow) -> Result<Self, Self::Error> {
        let phone = PhoneNumber::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;

        let last_service = match (
            row.last_service_id,
            row.last_service_name,
            row.last_price,
            row.last_service_date,
            row.last_service_created_at,
        ) {
            (Some(id), Some(service_name), Some(price), Some(service_date), Some(created_at)) => {
                Some(Service {
                    id: ServiceId::new(id),
                    customer_id: CustomerId::new(row.id),
                    service_name,
                    notes: row.last_service_notes,
                    staff_name: row.last_staff_name,
                    service_type_id: row.last_service_type_id.map(ServiceTypeId::new),
                    price,
                    service_date,
                    created_at,
                })
            }
            (None, None, None, None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(
                    "partial last-service row in customer summary".to_string(),
                ));
            }
        };

        Ok(Self {
            customer: Customer {
                id: CustomerId::new(row.id),
                name: row.name,
                phone,
                birthdate: row.birthdate,
                address: row.address,
                notes: row.notes,
                created_at: row.created_at,
            },
            last_visit: last_service.as_ref().map(|s| s.service_date),
            last_service,
            visit_count: row.visit_count,
        })
    }
}

/// Internal row type for the visit-count aggregate.
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_visits: i64,
    first_visit: Option<DateTime<Utc>>,
    last_visit: Option<DateTime<Utc>>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all customers, newest first, with their visit count and most
    /// recent service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored phone number is invalid.
    pub async fn list_with_summary(&self) -> Result<Vec<CustomerWithSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerWithSummaryRow>(
            r"
            SELECT
                c.id, c.name, c.phone, c.birthdate, c.address, c.notes, c.created_at,
                v.visit_count,
                ls.id AS last_service_id,
                ls.service_name AS last_service_name,
                ls.notes AS last_service_notes,
                ls.staff_name AS last_staff_name,
                ls.service_type_id AS last_service_type_id,
                ls.price AS last_price,
                ls.service_date AS last_service_date,
                ls.created_at AS last_service_created_at
            FROM customers c
            CROSS JOIN LATERAL (
                SELECT COUNT(*) AS visit_count
                FROM services s
                WHERE s.customer_id = c.id
            ) v
            LEFT JOIN LATERAL (
                SELECT *
                FROM services s
                WHERE s.customer_id = c.id
                ORDER BY s.service_date DESC, s.id DESC
                LIMIT 1
            ) ls ON TRUE
            ORDER BY c.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a customer by ID with their visit count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored phone number is invalid.
    pub async fn get_with_visit_count(
        &self,
        id: CustomerId,
    ) -> Result<Option<CustomerWithVisitCount>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            #[sqlx(flatten)]
            customer: CustomerRow,
            visit_count: i64,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT
                c.id, c.name, c.phone, c.birthdate, c.address, c.notes, c.created_at,
                (SELECT COUNT(*) FROM services s WHERE s.customer_id = c.id) AS visit_count
            FROM customers c
            WHERE c.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(CustomerWithVisitCount {
                customer: r.customer.try_into()?,
                visit_count: r.visit_count,
            })),
            None => Ok(None),
        }
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers (name, phone, birthdate, address, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, phone, birthdate, address, notes, created_at
            ",
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(input.birthdate)
        .bind(&input.address)
        .bind(&input.notes)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace a customer's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customers
            SET name = $2, phone = $3, birthdate = $4, address = $5, notes = $6
            WHERE id = $1
            RETURNING id, name, phone, birthdate, address, notes, created_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(input.birthdate)
        .bind(&input.address)
        .bind(&input.notes)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a customer and everything that hangs off them.
    ///
    /// Removes image rows for the customer's services, then the services,
    /// then the customer, all in one transaction.
    ///
    /// # Returns
    ///
    /// Returns `true` if the customer was deleted, `false` if they didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM service_images
            WHERE service_id IN (SELECT id FROM services WHERE customer_id = $1)
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM services WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Nothing deleted; dropping the transaction rolls it back
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Aggregate a customer's visit history.
    ///
    /// The favorite service is the most frequent `service_name`; ties break
    /// alphabetically so repeated calls agree. An unknown customer ID yields
    /// the empty summary rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn summary(&self, id: CustomerId) -> Result<CustomerSummary, RepositoryError> {
        let totals = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT
                COUNT(*) AS total_visits,
                MIN(service_date) AS first_visit,
                MAX(service_date) AS last_visit
            FROM services
            WHERE customer_id = $1
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        let favorite_service = sqlx::query_scalar::<_, String>(
            r"
            SELECT service_name
            FROM services
            WHERE customer_id = $1
            GROUP BY service_name
            ORDER BY COUNT(*) DESC, service_name ASC
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(CustomerSummary {
            total_visits: totals.total_visits,
            first_visit: totals.first_visit,
            last_visit: totals.last_visit,
            favorite_service,
        })
    }
}
