//! HTTP route handlers for the salon API.
//!
//! # Route Structure
//!
//! All routes are nested under `/api` by the binary; health probes live at
//! the root.
//!
//! ```text
//! # Customers
//! GET    /api/customers                  - List customers with visit summary
//! POST   /api/customers                  - Create customer
//! GET    /api/customers/{id}             - Customer with visit count
//! PUT    /api/customers/{id}             - Replace customer
//! DELETE /api/customers/{id}             - Delete customer (cascades)
//! GET    /api/customers/{id}/summary     - Visit/favorite-service aggregate
//! GET    /api/customers/{id}/services    - The customer's service history
//!
//! # Services
//! GET    /api/services                   - List all services
//! POST   /api/services                   - Record a service
//! PUT    /api/services/{id}              - Replace service
//! DELETE /api/services/{id}              - Delete service (and its images)
//! GET    /api/services/{id}/images       - List a service's images
//! POST   /api/services/{id}/images       - Attach an image
//! DELETE /api/services/images/{id}       - Delete an image
//!
//! # Staff
//! GET    /api/staff                      - List staff members
//! POST   /api/staff                      - Add staff member
//! GET    /api/staff/{id}                 - Staff member with assignments
//! PUT    /api/staff/{id}                 - Replace staff member
//! DELETE /api/staff/{id}                 - Delete staff member
//! POST   /api/staff/{staffId}/services/{serviceTypeId} - Assign service type
//! DELETE /api/staff/assignments/{id}     - Remove assignment
//!
//! # Catalog
//! GET    /api/service-categories         - List categories
//! POST   /api/service-categories         - Create category
//! GET    /api/service-categories/{id}    - Get category
//! PUT    /api/service-categories/{id}    - Replace category
//! DELETE /api/service-categories/{id}    - Delete category (if unused)
//! GET    /api/service-types              - List types (?categoryId= filters)
//! POST   /api/service-types              - Create type
//! GET    /api/service-types/{id}         - Get type with category
//! PUT    /api/service-types/{id}         - Replace type
//! DELETE /api/service-types/{id}         - Delete type (if unused)
//!
//! # Reports
//! GET    /api/reports/revenue            - Per-day revenue (?from=&to=)
//! GET    /api/reports/totals             - Headline totals (?from=&to=)
//! GET    /api/reports/service-distribution - Count per type (?from=&to=)
//! ```

pub mod catalog;
pub mod customers;
pub mod reports;
pub mod services;
pub mod staff;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route(
            "/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/{id}/summary", get(customers::summary))
        .route("/{id}/services", get(customers::services))
}

/// Create the service routes router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list).post(services::create))
        .route("/{id}", put(services::update).delete(services::delete))
        .route(
            "/{id}/images",
            get(services::list_images).post(services::add_image),
        )
        .route("/images/{id}", delete(services::delete_image))
}

/// Create the staff routes router.
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(staff::list).post(staff::create))
        .route(
            "/{id}",
            get(staff::get).put(staff::update).delete(staff::delete),
        )
        .route("/{staff_id}/services/{service_type_id}", post(staff::assign))
        .route("/assignments/{id}", delete(staff::unassign))
}

/// Create the service-category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_categories).post(catalog::create_category))
        .route(
            "/{id}",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
}

/// Create the service-type routes router.
pub fn service_type_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_types).post(catalog::create_type))
        .route(
            "/{id}",
            get(catalog::get_type)
                .put(catalog::update_type)
                .delete(catalog::delete_type),
        )
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/revenue", get(reports::revenue))
        .route("/totals", get(reports::totals))
        .route("/service-distribution", get(reports::service_distribution))
}

/// Create all API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", customer_routes())
        .nest("/services", service_routes())
        .nest("/staff", staff_routes())
        .nest("/service-categories", category_routes())
        .nest("/service-types", service_type_routes())
        .nest("/reports", report_routes())
}
