//! Database operations for the salon `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `customers` - Salon customers and contact details
//! - `services` - Service history, one row per visit
//! - `service_images` - Before/after photos attached to a service
//! - `staff_members` - Staff roster
//! - `service_categories` - Catalog groupings (e.g., Hair, Spa)
//! - `service_types` - Priced catalog entries within a category
//! - `staff_service_assignments` - Which staff member performs which type
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p lotus-bloom-cli -- migrate
//! ```

pub mod catalog;
pub mod customers;
pub mod reports;
pub mod services;
pub mod staff;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use reports::ReportRepository;
pub use services::ServiceRepository;
pub use staff::StaffRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate staff assignment).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A row referenced by the write does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The row is still referenced by other rows and cannot be deleted.
    #[error("in use: {0}")]
    InUse(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
