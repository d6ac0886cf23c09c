//! Domain models for the salon API.
//!
//! All structs serialize with camelCase field names because the browser
//! client's wire contract predates this server.

pub mod catalog;
pub mod customer;
pub mod report;
pub mod service;
pub mod staff;

pub use catalog::{ServiceCategory, ServiceType, ServiceTypeWithCategory};
pub use customer::{Customer, CustomerSummary, CustomerWithSummary, CustomerWithVisitCount};
pub use report::{DailyRevenue, RevenueTotals, ServiceTypeDistribution};
pub use service::{Service, ServiceImage};
pub use staff::{AssignmentDetail, ServiceAssignment, StaffMember, StaffWithAssignments};
