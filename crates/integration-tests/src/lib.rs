//! Integration tests for the Lotus Bloom salon API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p lotus-bloom-cli -- migrate
//!
//! # Start the server
//! cargo run -p lotus-bloom-server
//!
//! # Run integration tests (ignored by default)
//! cargo test -p lotus-bloom-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP (`SALON_BASE_URL`, default
//! `http://localhost:3000`) and create their own records with unique names,
//! so they can run against a seeded database without clobbering it. Each
//! test cleans up what it created.
//!
//! # Test Categories
//!
//! - `api_health` - Liveness and readiness probes
//! - `api_customers` - Customer CRUD, visit summaries, cascade deletes
//! - `api_services` - Service history and image attachments
//! - `api_staff` - Staff CRUD and service-type assignments
//! - `api_catalog` - Categories and priced service types
//! - `api_reports` - Revenue, totals, and service distribution
