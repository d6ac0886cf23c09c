//! Core types for Lotus Bloom Salon.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;

pub use id::*;
pub use phone::{PhoneNumber, PhoneNumberError};
