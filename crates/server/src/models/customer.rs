//! Customer domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use lotus_bloom_core::{CustomerId, PhoneNumber};

use crate::models::Service;

/// A salon customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Full name as entered at the front desk.
    pub name: String,
    /// Contact phone number.
    pub phone: PhoneNumber,
    /// Birthdate, used for birthday promotions.
    pub birthdate: Option<NaiveDate>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes (allergies, preferences).
    pub notes: Option<String>,
    /// When the customer record was created.
    pub created_at: DateTime<Utc>,
}

/// A customer decorated with list-view aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWithSummary {
    #[serde(flatten)]
    pub customer: Customer,
    /// Number of services on record.
    pub visit_count: i64,
    /// Date of the most recent service, if any.
    pub last_visit: Option<DateTime<Utc>>,
    /// The most recent service row, if any.
    pub last_service: Option<Service>,
}

/// A customer decorated with only their visit count (detail view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWithVisitCount {
    #[serde(flatten)]
    pub customer: Customer,
    /// Number of services on record.
    pub visit_count: i64,
}

/// Validated input for creating or replacing a customer.
///
/// Built by the route layer after request validation; the phone number is
/// already parsed here so the repository never sees a raw string.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    /// Full name.
    pub name: String,
    /// Contact phone number.
    pub phone: PhoneNumber,
    /// Birthdate, if given.
    pub birthdate: Option<NaiveDate>,
    /// Postal address.
    pub address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Aggregate history for a single customer.
///
/// A customer with no services yields zero visits and `None` everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    /// Total number of services on record.
    pub total_visits: i64,
    /// Date of the first recorded service.
    pub first_visit: Option<DateTime<Utc>>,
    /// Date of the most recent service.
    pub last_visit: Option<DateTime<Utc>>,
    /// Most frequently performed service name; ties break alphabetically.
    pub favorite_service: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_customer() -> Customer {
        Customer {
            id: CustomerId::new(1),
            name: "Sarah Johnson".to_string(),
            phone: PhoneNumber::parse("555-0123").unwrap(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12),
            address: None,
            notes: Some("Prefers afternoon appointments".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_serializes_camel_case() {
        let json = serde_json::to_value(test_customer()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Sarah Johnson");
        assert_eq!(json["phone"], "555-0123");
        assert_eq!(json["birthdate"], "1990-04-12");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_with_summary_flattens_customer_fields() {
        let with_summary = CustomerWithSummary {
            customer: test_customer(),
            visit_count: 3,
            last_visit: None,
            last_service: None,
        };

        let json = serde_json::to_value(&with_summary).unwrap();
        assert_eq!(json["name"], "Sarah Johnson");
        assert_eq!(json["visitCount"], 3);
        assert!(json["lastVisit"].is_null());
    }

    #[test]
    fn test_empty_summary_shape() {
        let summary = CustomerSummary {
            total_visits: 0,
            first_visit: None,
            last_visit: None,
            favorite_service: None,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalVisits"], 0);
        assert!(json["favoriteService"].is_null());
    }
}
