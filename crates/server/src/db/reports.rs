//! Aggregate queries backing the reports page.
//!
//! All three reports accept optional inclusive date bounds on the calendar
//! day of `service_date`. `NULL` bounds are pushed into the SQL so one query
//! shape serves the bounded and unbounded cases.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::report::{DailyRevenue, RevenueTotals, ServiceTypeDistribution};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for per-day revenue.
#[derive(Debug, sqlx::FromRow)]
struct DailyRevenueRow {
    date: NaiveDate,
    service_count: i64,
    revenue: Decimal,
}

impl From<DailyRevenueRow> for DailyRevenue {
    fn from(row: DailyRevenueRow) -> Self {
        Self {
            date: row.date,
            service_count: row.service_count,
            revenue: row.revenue,
        }
    }
}

/// Internal row type for the headline totals.
#[derive(Debug, sqlx::FromRow)]
struct TotalsRow {
    total_services: i64,
    total_revenue: Decimal,
    average_service_price: Decimal,
}

impl From<TotalsRow> for RevenueTotals {
    fn from(row: TotalsRow) -> Self {
        Self {
            total_services: row.total_services,
            total_revenue: row.total_revenue,
            average_service_price: row.average_service_price,
        }
    }
}

/// Internal row type for per-type counts.
#[derive(Debug, sqlx::FromRow)]
struct DistributionRow {
    service_type: String,
    count: i64,
}

impl From<DistributionRow> for ServiceTypeDistribution {
    fn from(row: DistributionRow) -> Self {
        Self {
            service_type: row.service_type,
            count: row.count,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for revenue report queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Revenue and service count per calendar day, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_day(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyRevenueRow>(
            r"
            SELECT
                service_date::date AS date,
                COUNT(*) AS service_count,
                COALESCE(SUM(price), 0) AS revenue
            FROM services
            WHERE ($1::date IS NULL OR service_date::date >= $1)
              AND ($2::date IS NULL OR service_date::date <= $2)
            GROUP BY service_date::date
            ORDER BY date ASC
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Headline totals for the period: service count, revenue, average price.
    ///
    /// All three are zero when no services fall inside the bounds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn totals(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<RevenueTotals, RepositoryError> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r"
            SELECT
                COUNT(*) AS total_services,
                COALESCE(SUM(price), 0) AS total_revenue,
                COALESCE(AVG(price), 0) AS average_service_price
            FROM services
            WHERE ($1::date IS NULL OR service_date::date >= $1)
              AND ($2::date IS NULL OR service_date::date <= $2)
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Service count per catalog type name, busiest first.
    ///
    /// Services recorded without a catalog type group under `"Other"`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn service_distribution(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ServiceTypeDistribution>, RepositoryError> {
        let rows = sqlx::query_as::<_, DistributionRow>(
            r"
            SELECT
                COALESCE(t.name, 'Other') AS service_type,
                COUNT(*) AS count
            FROM services s
            LEFT JOIN service_types t ON t.id = s.service_type_id
            WHERE ($1::date IS NULL OR s.service_date::date >= $1)
              AND ($2::date IS NULL OR s.service_date::date <= $2)
            GROUP BY COALESCE(t.name, 'Other')
            ORDER BY count DESC, service_type ASC
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
