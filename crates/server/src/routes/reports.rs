//! Revenue report route handlers.
//!
//! Read-only aggregates over the service history. All three endpoints take
//! optional inclusive `?from=` / `?to=` date bounds (YYYY-MM-DD) on the
//! calendar day the service was performed; an inverted range simply matches
//! nothing.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::ReportRepository;
use crate::error::AppError;
use crate::models::report::{DailyRevenue, RevenueTotals, ServiceTypeDistribution};
use crate::state::AppState;

/// Optional date bounds shared by all report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Revenue and service count per calendar day.
///
/// GET /api/reports/revenue
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn revenue(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<DailyRevenue>>, AppError> {
    let rows = ReportRepository::new(state.pool())
        .revenue_by_day(query.from, query.to)
        .await?;

    Ok(Json(rows))
}

/// Headline totals for the period.
///
/// GET /api/reports/totals
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn totals(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<RevenueTotals>, AppError> {
    let totals = ReportRepository::new(state.pool())
        .totals(query.from, query.to)
        .await?;

    Ok(Json(totals))
}

/// Service count per catalog type.
///
/// GET /api/reports/service-distribution
///
/// # Errors
///
/// Returns `AppError` if the database query fails.
pub async fn service_distribution(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<ServiceTypeDistribution>>, AppError> {
    let rows = ReportRepository::new(state.pool())
        .service_distribution(query.from, query.to)
        .await?;

    Ok(Json(rows))
}
