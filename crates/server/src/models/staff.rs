//! Staff roster domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotus_bloom_core::{AssignmentId, PhoneNumber, ServiceTypeId, StaffMemberId};

use crate::models::ServiceTypeWithCategory;

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    /// Unique staff member ID.
    pub id: StaffMemberId,
    /// Full name.
    pub name: String,
    /// Job title, free text (e.g., "Stylist", "Colorist").
    pub role: String,
    /// Contact phone number.
    pub phone: Option<PhoneNumber>,
    /// Contact email address.
    pub email: Option<String>,
    /// When the staff member was added.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a staff member.
#[derive(Debug, Clone)]
pub struct StaffInput {
    /// Full name.
    pub name: String,
    /// Job title.
    pub role: String,
    /// Contact phone number.
    pub phone: Option<PhoneNumber>,
    /// Contact email address.
    pub email: Option<String>,
}

/// A staff-to-service-type assignment row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAssignment {
    /// Unique assignment ID.
    pub id: AssignmentId,
    /// The assigned staff member.
    pub staff_id: StaffMemberId,
    /// The service type they perform.
    pub service_type_id: ServiceTypeId,
    /// When the assignment was made.
    pub created_at: DateTime<Utc>,
}

/// An assignment with its service type (and category) embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    /// Unique assignment ID.
    pub id: AssignmentId,
    /// The service type they perform.
    pub service_type_id: ServiceTypeId,
    /// Full service type details for display.
    pub service_type: ServiceTypeWithCategory,
}

/// A staff member with their assignments, as the detail page expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffWithAssignments {
    #[serde(flatten)]
    pub staff: StaffMember,
    /// Service types this member performs.
    pub service_assignments: Vec<AssignmentDetail>,
}
