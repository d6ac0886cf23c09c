//! Revenue report domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Revenue for a single calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    /// Calendar day (date of the services, not of record creation).
    pub date: NaiveDate,
    /// Number of services performed that day.
    pub service_count: i64,
    /// Revenue for the day. Serializes as a decimal string.
    pub revenue: Decimal,
}

/// Headline numbers for the reports page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTotals {
    /// Total number of services in the period.
    pub total_services: i64,
    /// Total revenue in the period.
    pub total_revenue: Decimal,
    /// Average price per service; zero when there are no services.
    pub average_service_price: Decimal,
}

/// How many services were performed per catalog type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeDistribution {
    /// Service type name; services without a type group under "Other".
    pub service_type: String,
    /// Number of services of this type in the period.
    pub count: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_revenue_wire_shape() {
        let row = DailyRevenue {
            date: NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            service_count: 4,
            revenue: Decimal::new(120_000_000, 2),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["date"], "2026-08-15");
        assert_eq!(json["serviceCount"], 4);
        assert_eq!(json["revenue"], "1200000.00");
    }

    #[test]
    fn test_totals_wire_shape() {
        let totals = RevenueTotals {
            total_services: 0,
            total_revenue: Decimal::ZERO,
            average_service_price: Decimal::ZERO,
        };

        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["totalServices"], 0);
        assert_eq!(json["totalRevenue"], "0");
        assert_eq!(json["averageServicePrice"], "0");
    }
}
