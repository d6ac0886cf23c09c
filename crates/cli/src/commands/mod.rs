//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read the database URL from `SALON_DATABASE_URL`, falling back to the
/// generic `DATABASE_URL` that Fly.io postgres attach sets.
pub(crate) fn database_url() -> Option<SecretString> {
    std::env::var("SALON_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
