//! Service history domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lotus_bloom_core::{CustomerId, ServiceId, ServiceImageId, ServiceTypeId};

/// A service performed on a customer (one row per visit).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique service ID.
    pub id: ServiceId,
    /// Customer who received the service.
    pub customer_id: CustomerId,
    /// Name of the service as shown on the receipt.
    pub service_name: String,
    /// Free-form notes (products used, formulas).
    pub notes: Option<String>,
    /// Name of the staff member who performed the service.
    pub staff_name: Option<String>,
    /// Catalog entry this service was booked from, if any.
    pub service_type_id: Option<ServiceTypeId>,
    /// Amount charged. Serializes as a decimal string.
    pub price: Decimal,
    /// When the service was performed.
    pub service_date: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a service.
#[derive(Debug, Clone)]
pub struct ServiceInput {
    /// Customer who received the service.
    pub customer_id: CustomerId,
    /// Name of the service.
    pub service_name: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Name of the staff member who performed the service.
    pub staff_name: Option<String>,
    /// Catalog entry this service was booked from, if any.
    pub service_type_id: Option<ServiceTypeId>,
    /// Amount charged; zero when the client omitted it.
    pub price: Decimal,
    /// When the service was performed. `None` means "now" on create and
    /// "keep the stored date" on update.
    pub service_date: Option<DateTime<Utc>>,
}

/// A photo attached to a service (before/after shots).
///
/// The URL is opaque to the server: either an http(s) link or a base64
/// `data:` URL uploaded by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceImage {
    /// Unique image ID.
    pub id: ServiceImageId,
    /// Service this image belongs to.
    pub service_id: ServiceId,
    /// Image location or inline data URL.
    pub image_url: String,
    /// When the image was attached.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_price_serializes_as_string() {
        let service = Service {
            id: ServiceId::new(10),
            customer_id: CustomerId::new(1),
            service_name: "Hair Coloring".to_string(),
            notes: None,
            staff_name: Some("Ashley".to_string()),
            service_type_id: Some(ServiceTypeId::new(3)),
            price: Decimal::new(45_000_000, 2),
            service_date: Utc::now(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["serviceName"], "Hair Coloring");
        assert_eq!(json["price"], "450000.00");
        assert_eq!(json["serviceTypeId"], 3);
    }

    #[test]
    fn test_service_deserializes_numeric_price() {
        // Older clients send the price as a JSON number
        let json = serde_json::json!({
            "id": 10,
            "customerId": 1,
            "serviceName": "Manicure",
            "notes": null,
            "staffName": null,
            "serviceTypeId": null,
            "price": 150000,
            "serviceDate": "2026-08-01T10:00:00Z",
            "createdAt": "2026-08-01T10:00:00Z",
        });

        let service: Service = serde_json::from_value(json).unwrap();
        assert_eq!(service.price, Decimal::new(150_000, 0));
    }
}
