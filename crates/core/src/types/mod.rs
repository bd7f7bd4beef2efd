//! Core types for Niba Vision.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod genre;
pub mod id;
pub mod item;
pub mod price;
pub mod profile;

pub use email::{Email, EmailError};
pub use genre::Genre;
pub use id::*;
pub use item::CatalogItem;
pub use price::{CurrencyCode, Price};
pub use profile::UserProfile;
