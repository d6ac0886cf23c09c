//! Service catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lotus_bloom_core::{ServiceCategoryId, ServiceTypeId};

/// A catalog grouping such as "Hair" or "Spa".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    /// Unique category ID.
    pub id: ServiceCategoryId,
    /// Display name.
    pub name: String,
    /// Optional description shown in the booking UI.
    pub description: Option<String>,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// A priced catalog entry within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceType {
    /// Unique service type ID.
    pub id: ServiceTypeId,
    /// Category this type belongs to.
    pub category_id: ServiceCategoryId,
    /// Display name.
    pub name: String,
    /// Optional description shown in the booking UI.
    pub description: Option<String>,
    /// List price. Serializes as a decimal string.
    pub price: Decimal,
    /// Typical appointment length.
    pub duration_minutes: i32,
    /// When the type was created.
    pub created_at: DateTime<Utc>,
}

/// A service type with its category embedded, as the catalog screens expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeWithCategory {
    #[serde(flatten)]
    pub service_type: ServiceType,
    /// The owning category.
    pub category: ServiceCategory,
}

/// Validated input for creating or replacing a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Validated input for creating or replacing a service type.
#[derive(Debug, Clone)]
pub struct ServiceTypeInput {
    /// Category this type belongs to.
    pub category_id: ServiceCategoryId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// List price.
    pub price: Decimal,
    /// Typical appointment length.
    pub duration_minutes: i32,
}
