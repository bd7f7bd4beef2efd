//! Niba Vision Core - Shared domain types.
//!
//! This crate provides common types used across all Niba Vision components:
//! - `store` - Reactive cart/session state layer
//! - the UI layer and the catalog/auth network clients (external to this
//!   workspace)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no channels, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails,
//!   plus the catalog and user-profile models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
