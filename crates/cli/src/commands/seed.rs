//! Seed the database with demo salon data.
//!
//! # Usage
//!
//! ```bash
//! lb-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `SALON_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Seeding is idempotent at table granularity: staff, catalog, assignments,
//! and customers each check for existing rows and skip themselves rather
//! than duplicating data. The service history is only seeded together with
//! fresh customers so it never points at someone else's records.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use lotus_bloom_core::{PhoneNumber, PhoneNumberError};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A hardcoded phone number failed domain validation.
    #[error("Invalid phone number in seed data: {0}")]
    Phone(#[from] PhoneNumberError),

    /// A hardcoded date is not a real calendar date.
    #[error("Invalid date in seed data: {year}-{month:02}-{day:02}")]
    Date { year: i32, month: u32, day: u32 },

    /// A seed row references another row that is missing.
    #[error("Seed data references a missing row: {0}")]
    MissingRow(&'static str),
}

struct StaffSeed {
    name: &'static str,
    role: &'static str,
}

struct CategorySeed {
    name: &'static str,
    description: &'static str,
}

struct TypeSeed {
    category: &'static str,
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    duration_minutes: i32,
}

struct CustomerSeed {
    name: &'static str,
    phone: &'static str,
    birthdate: (i32, u32, u32),
    address: &'static str,
    notes: &'static str,
}

struct ServiceSeed {
    customer: &'static str,
    service_name: &'static str,
    notes: &'static str,
    staff_name: &'static str,
    /// Catalog type to link, when the service matches one.
    service_type: Option<&'static str>,
    price_cents: i64,
    date: (i32, u32, u32),
}

const STAFF: &[StaffSeed] = &[
    StaffSeed { name: "Jennifer", role: "Stylist" },
    StaffSeed { name: "Michael", role: "Stylist" },
    StaffSeed { name: "Ashley", role: "Colorist" },
    StaffSeed { name: "David", role: "Massage Therapist" },
    StaffSeed { name: "Maria", role: "Esthetician" },
];

const CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        name: "Hair",
        description: "Cuts, color, styling, and treatments",
    },
    CategorySeed {
        name: "Spa",
        description: "Massage, skin, and nail care",
    },
];

const TYPES: &[TypeSeed] = &[
    TypeSeed {
        category: "Hair",
        name: "Haircut & Styling",
        description: "Cut and finish with blow-dry styling",
        price_cents: 65_00,
        duration_minutes: 45,
    },
    TypeSeed {
        category: "Hair",
        name: "Hair Coloring",
        description: "Single-process color or highlights",
        price_cents: 150_00,
        duration_minutes: 120,
    },
    TypeSeed {
        category: "Hair",
        name: "Deep Conditioning Treatment",
        description: "Intensive repair mask treatment",
        price_cents: 45_00,
        duration_minutes: 30,
    },
    TypeSeed {
        category: "Spa",
        name: "Massage Therapy",
        description: "Swedish or deep tissue massage",
        price_cents: 90_00,
        duration_minutes: 60,
    },
    TypeSeed {
        category: "Spa",
        name: "Facial Treatment",
        description: "Deep cleansing facial with mask",
        price_cents: 80_00,
        duration_minutes: 50,
    },
];

/// Who performs which catalog type, by name.
const ASSIGNMENTS: &[(&str, &str)] = &[
    ("Jennifer", "Haircut & Styling"),
    ("Jennifer", "Hair Coloring"),
    ("Michael", "Haircut & Styling"),
    ("Ashley", "Hair Coloring"),
    ("David", "Massage Therapy"),
    ("Maria", "Facial Treatment"),
];

const CUSTOMERS: &[CustomerSeed] = &[
    CustomerSeed {
        name: "Sarah Johnson",
        phone: "(555) 123-4567",
        birthdate: (1985, 12, 24),
        address: "123 Main St, Anytown, CA",
        notes: "Prefers ammonia-free hair color. Allergic to lavender-based products.",
    },
    CustomerSeed {
        name: "Michael Chen",
        phone: "(555) 987-6543",
        birthdate: (1990, 5, 17),
        address: "456 Oak Ave, Baytown, NY",
        notes: "Sensitive scalp, use gentle products.",
    },
    CustomerSeed {
        name: "Emily Rodriguez",
        phone: "(555) 234-5678",
        birthdate: (1982, 9, 3),
        address: "789 Pine St, Westville, FL",
        notes: "Prefers female stylists only.",
    },
    CustomerSeed {
        name: "James Wilson",
        phone: "(555) 345-6789",
        birthdate: (1977, 11, 29),
        address: "321 Cedar Ln, Riverdale, TX",
        notes: "Always on time, prefers early appointments.",
    },
    CustomerSeed {
        name: "Sophia Martinez",
        phone: "(555) 456-7890",
        birthdate: (1995, 3, 15),
        address: "654 Maple Rd, Lakeside, WA",
        notes: "First-time client referred by James Wilson.",
    },
];

const SERVICES: &[ServiceSeed] = &[
    ServiceSeed {
        customer: "Sarah Johnson",
        service_name: "Hair Coloring",
        notes: "Used Wella Color Touch 7/0 with 10 vol developer. Client wanted to refresh \
                her medium blonde color. Added a few highlights around the face for dimension. \
                She was very happy with the results and scheduled her next appointment in 6 weeks.",
        staff_name: "Jennifer (Stylist)",
        service_type: Some("Hair Coloring"),
        price_cents: 150_00,
        date: (2023, 6, 15),
    },
    ServiceSeed {
        customer: "Sarah Johnson",
        service_name: "Haircut & Styling",
        notes: "Trim and layers, blow-dry with round brush for volume.",
        staff_name: "Michael (Stylist)",
        service_type: Some("Haircut & Styling"),
        price_cents: 65_00,
        date: (2023, 5, 2),
    },
    ServiceSeed {
        customer: "Sarah Johnson",
        service_name: "Deep Conditioning Treatment",
        notes: "Used Kerastase nutrition mask for damaged hair.",
        staff_name: "Jennifer (Stylist)",
        service_type: Some("Deep Conditioning Treatment"),
        price_cents: 45_00,
        date: (2023, 3, 18),
    },
    ServiceSeed {
        customer: "Sarah Johnson",
        service_name: "Haircut & Blowdry",
        notes: "Cut 2 inches, styled with beach waves.",
        staff_name: "Michael (Stylist)",
        service_type: None,
        price_cents: 70_00,
        date: (2023, 2, 5),
    },
    ServiceSeed {
        customer: "Michael Chen",
        service_name: "Facial Treatment",
        notes: "Deep cleansing facial with extraction and hydration mask.",
        staff_name: "Maria (Esthetician)",
        service_type: Some("Facial Treatment"),
        price_cents: 80_00,
        date: (2023, 8, 3),
    },
    ServiceSeed {
        customer: "Michael Chen",
        service_name: "Haircut",
        notes: "Modern fade with textured top.",
        staff_name: "Michael (Stylist)",
        service_type: None,
        price_cents: 40_00,
        date: (2023, 6, 20),
    },
    ServiceSeed {
        customer: "Michael Chen",
        service_name: "Scalp Treatment",
        notes: "Anti-dandruff treatment with tea tree oil.",
        staff_name: "Jennifer (Stylist)",
        service_type: None,
        price_cents: 55_00,
        date: (2023, 4, 11),
    },
    ServiceSeed {
        customer: "Emily Rodriguez",
        service_name: "Manicure & Pedicure",
        notes: "Gel polish on hands (shade: Berry Bliss), regular polish on toes \
                (shade: Coral Sunset).",
        staff_name: "Maria (Esthetician)",
        service_type: None,
        price_cents: 75_00,
        date: (2023, 9, 22),
    },
    ServiceSeed {
        customer: "Emily Rodriguez",
        service_name: "Hair Coloring",
        notes: "Full highlights with balayage technique.",
        staff_name: "Ashley (Colorist)",
        service_type: Some("Hair Coloring"),
        price_cents: 150_00,
        date: (2023, 8, 15),
    },
    ServiceSeed {
        customer: "Emily Rodriguez",
        service_name: "Massage Therapy",
        notes: "60-minute deep tissue massage focusing on shoulders and back.",
        staff_name: "David (Massage Therapist)",
        service_type: Some("Massage Therapy"),
        price_cents: 90_00,
        date: (2023, 7, 2),
    },
    ServiceSeed {
        customer: "Emily Rodriguez",
        service_name: "Facial",
        notes: "Anti-aging treatment with collagen mask.",
        staff_name: "Maria (Esthetician)",
        service_type: None,
        price_cents: 80_00,
        date: (2023, 5, 19),
    },
    ServiceSeed {
        customer: "James Wilson",
        service_name: "Haircut & Styling",
        notes: "Clean up sides and back, light trim on top. Styled with matte pomade.",
        staff_name: "Michael (Stylist)",
        service_type: Some("Haircut & Styling"),
        price_cents: 65_00,
        date: (2023, 7, 18),
    },
    ServiceSeed {
        customer: "James Wilson",
        service_name: "Massage",
        notes: "30-minute neck and shoulder focus.",
        staff_name: "David (Massage Therapist)",
        service_type: None,
        price_cents: 50_00,
        date: (2023, 6, 5),
    },
    ServiceSeed {
        customer: "James Wilson",
        service_name: "Facial",
        notes: "Men's cleansing facial with exfoliation.",
        staff_name: "Maria (Esthetician)",
        service_type: None,
        price_cents: 80_00,
        date: (2023, 4, 22),
    },
    ServiceSeed {
        customer: "Sophia Martinez",
        service_name: "Massage Therapy",
        notes: "90-minute full body Swedish massage. First time client, enjoyed experience.",
        staff_name: "David (Massage Therapist)",
        service_type: Some("Massage Therapy"),
        price_cents: 120_00,
        date: (2023, 9, 5),
    },
    ServiceSeed {
        customer: "Sophia Martinez",
        service_name: "Manicure",
        notes: "Shape, buff, and clear polish with hand massage.",
        staff_name: "Maria (Esthetician)",
        service_type: None,
        price_cents: 35_00,
        date: (2023, 8, 19),
    },
];

/// Before/after shots for Sarah Johnson's hair coloring service.
const SAMPLE_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1562594980-47d4717c7c26?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=200&q=80",
    "https://images.unsplash.com/photo-1605497788044-5a32c7078486?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D&auto=format&fit=crop&w=200&q=80",
];

/// Seed the salon database with demo data.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing, a query fails, or
/// the hardcoded seed data fails domain validation.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("SALON_DATABASE_URL"))?;

    info!("Connecting to salon database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    seed_staff(&pool).await?;
    seed_catalog(&pool).await?;
    seed_assignments(&pool).await?;
    seed_customers_and_history(&pool).await?;

    info!("Database seeding complete");
    Ok(())
}

/// Insert the staff roster unless staff members already exist.
async fn seed_staff(pool: &PgPool) -> Result<(), SeedError> {
    if table_has_rows(pool, "staff_members").await? {
        info!("Staff members already exist, skipping seed");
        return Ok(());
    }

    for staff in STAFF {
        sqlx::query("INSERT INTO staff_members (name, role) VALUES ($1, $2)")
            .bind(staff.name)
            .bind(staff.role)
            .execute(pool)
            .await?;
    }

    info!("Staff members seeded successfully");
    Ok(())
}

/// Insert categories and their priced service types unless categories exist.
async fn seed_catalog(pool: &PgPool) -> Result<(), SeedError> {
    if table_has_rows(pool, "service_categories").await? {
        info!("Service categories already exist, skipping seed");
        return Ok(());
    }

    let mut category_ids: HashMap<&str, i32> = HashMap::new();
    for category in CATEGORIES {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO service_categories (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(category.name)
        .bind(category.description)
        .fetch_one(pool)
        .await?;
        category_ids.insert(category.name, id);
    }

    for service_type in TYPES {
        let category_id = category_ids
            .get(service_type.category)
            .copied()
            .ok_or(SeedError::MissingRow("category for service type seed"))?;

        sqlx::query(
            r"
            INSERT INTO service_types (category_id, name, description, price, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(category_id)
        .bind(service_type.name)
        .bind(service_type.description)
        .bind(Decimal::new(service_type.price_cents, 2))
        .bind(service_type.duration_minutes)
        .execute(pool)
        .await?;
    }

    info!("Service catalog seeded successfully");
    Ok(())
}

/// Wire staff to the catalog types they perform unless assignments exist.
///
/// Rows are matched by name so this also works against a catalog that was
/// not seeded by us; pairs that don't resolve are skipped.
async fn seed_assignments(pool: &PgPool) -> Result<(), SeedError> {
    if table_has_rows(pool, "staff_service_assignments").await? {
        info!("Staff assignments already exist, skipping seed");
        return Ok(());
    }

    let mut inserted = 0;
    for (staff_name, type_name) in ASSIGNMENTS {
        let staff_id =
            sqlx::query_scalar::<_, i32>("SELECT id FROM staff_members WHERE name = $1")
                .bind(staff_name)
                .fetch_optional(pool)
                .await?;
        let type_id = sqlx::query_scalar::<_, i32>("SELECT id FROM service_types WHERE name = $1")
            .bind(type_name)
            .fetch_optional(pool)
            .await?;

        if let (Some(staff_id), Some(type_id)) = (staff_id, type_id) {
            sqlx::query(
                "INSERT INTO staff_service_assignments (staff_id, service_type_id) VALUES ($1, $2)",
            )
            .bind(staff_id)
            .bind(type_id)
            .execute(pool)
            .await?;
            inserted += 1;
        }
    }

    info!(inserted, "Staff assignments seeded successfully");
    Ok(())
}

/// Insert customers, their service history, and the sample images.
///
/// The whole block is skipped when customers already exist so the history
/// never attaches to records we didn't create.
async fn seed_customers_and_history(pool: &PgPool) -> Result<(), SeedError> {
    if table_has_rows(pool, "customers").await? {
        info!("Customers already exist, skipping customer and service seed");
        return Ok(());
    }

    let mut customer_ids: HashMap<&str, i32> = HashMap::new();
    for customer in CUSTOMERS {
        let phone = PhoneNumber::parse(customer.phone)?;
        let (year, month, day) = customer.birthdate;
        let birthdate = naive_date(year, month, day)?;

        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO customers (name, phone, birthdate, address, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(customer.name)
        .bind(&phone)
        .bind(birthdate)
        .bind(customer.address)
        .bind(customer.notes)
        .fetch_one(pool)
        .await?;
        customer_ids.insert(customer.name, id);
    }
    info!("Customers seeded successfully");

    let mut first_coloring_id: Option<i32> = None;
    for service in SERVICES {
        let customer_id = customer_ids
            .get(service.customer)
            .copied()
            .ok_or(SeedError::MissingRow("customer for service seed"))?;
        let service_type_id = match service.service_type {
            Some(type_name) => {
                sqlx::query_scalar::<_, i32>("SELECT id FROM service_types WHERE name = $1")
                    .bind(type_name)
                    .fetch_optional(pool)
                    .await?
            }
            None => None,
        };
        let (year, month, day) = service.date;

        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO services
                (customer_id, service_name, notes, staff_name, service_type_id, price,
                 service_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(customer_id)
        .bind(service.service_name)
        .bind(service.notes)
        .bind(service.staff_name)
        .bind(service_type_id)
        .bind(Decimal::new(service.price_cents, 2))
        .bind(midnight_utc(year, month, day)?)
        .fetch_one(pool)
        .await?;

        if first_coloring_id.is_none() && service.service_name == "Hair Coloring" {
            first_coloring_id = Some(id);
        }
    }
    info!("Services seeded successfully");

    if let Some(service_id) = first_coloring_id {
        for image_url in SAMPLE_IMAGES {
            sqlx::query("INSERT INTO service_images (service_id, image_url) VALUES ($1, $2)")
                .bind(service_id)
                .bind(image_url)
                .execute(pool)
                .await?;
        }
        info!("Sample service images seeded successfully");
    }

    Ok(())
}

/// True when the table already contains rows.
async fn table_has_rows(pool: &PgPool, table: &str) -> Result<bool, SeedError> {
    // Table names come from the hardcoded seeders, never from input
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

fn naive_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, SeedError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(SeedError::Date { year, month, day })
}

fn midnight_utc(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, SeedError> {
    naive_date(year, month, day).map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}
