//! Niba Vision Store - Reactive client state layer.
//!
//! This crate owns the shopping cart and the authenticated-user session:
//! in-memory, observable, persistence-backed state containers that stay
//! consistent under concurrent mutation from multiple UI surfaces and
//! survive process restarts.
//!
//! # Architecture
//!
//! - [`observable`] - `ObservableContainer<T>`, the atomic update +
//!   subscribe primitive every store is built on
//! - [`persist`] - best-effort JSON snapshot storage and the background
//!   snapshot pump
//! - [`cart`] - [`CartStore`]: cart lines, derived item count, totals
//! - [`session`] - [`SessionStore`]: anonymous vs. authenticated state
//! - [`checkout`] - [`CheckoutCoordinator`]: single-fire cart clear on
//!   payment success
//! - [`catalog`] - read-only lookup seam to the catalog client, with a
//!   `moka`-backed cache
//! - [`stores`] - dependency-injected assembly of the above, one instance
//!   per process
//!
//! Mutations are synchronous and total: callers return as soon as the
//! in-memory atomic update lands, while a per-store background task writes
//! the snapshot out. Persistence is advisory; the in-memory state is
//! authoritative for the running process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod observable;
pub mod persist;
pub mod session;
pub mod stores;

pub use cart::{CartLine, CartState, CartStore};
pub use catalog::{CatalogCache, CatalogError, CatalogSource, PriceLookup};
pub use checkout::{CheckoutCoordinator, CheckoutPhase};
pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use observable::{ObservableContainer, Subscription};
pub use persist::{FileStore, MemoryStore, PersistenceAdapter, PersistenceError};
pub use session::{SessionState, SessionStore};
pub use stores::Stores;
