//! Read-only catalog lookup seam.
//!
//! The state layer never calls the network. The catalog client lives
//! behind [`CatalogSource`]; [`CatalogCache`] keeps the fetched items warm
//! so cart totals and display lookups are synchronous, and [`PriceLookup`]
//! is the one-method view [`crate::cart::CartStore::total_price`] needs.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use thiserror::Error;
use tracing::debug;

use niba_vision_core::{CatalogItem, ItemId, Price};

/// Errors from the catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog request could not be completed.
    #[error("catalog request failed: {0}")]
    Request(String),
    /// The catalog response could not be decoded.
    #[error("catalog response invalid: {0}")]
    Decode(String),
}

/// Boundary to the catalog/network client.
///
/// Implemented outside this crate by whatever fetches the book list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the current catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or decoded.
    async fn fetch_items(&self) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Read-only price lookup used for cart totals.
pub trait PriceLookup {
    /// Unit price for `item`, if the lookup knows it.
    fn price(&self, item: ItemId) -> Option<Price>;
}

impl PriceLookup for BTreeMap<ItemId, CatalogItem> {
    fn price(&self, item: ItemId) -> Option<Price> {
        self.get(&item).map(|catalog_item| catalog_item.price)
    }
}

/// Bounded, expiring cache of catalog items.
///
/// Populated from a [`CatalogSource`] by the app wiring; read
/// synchronously by the UI and by cart totals.
#[derive(Debug)]
pub struct CatalogCache {
    items: Cache<ItemId, CatalogItem>,
}

impl CatalogCache {
    /// Default maximum number of cached items.
    pub const DEFAULT_CAPACITY: u64 = 1024;
    /// Default expiry for cached items.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

    /// Create a cache with explicit bounds.
    #[must_use]
    pub fn new(max_capacity: u64, time_to_live: Duration) -> Self {
        Self {
            items: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(time_to_live)
                .build(),
        }
    }

    /// Refetch the catalog and cache every item.
    ///
    /// # Errors
    ///
    /// Propagates the source's error; previously cached items stay valid.
    pub async fn refresh(&self, source: &dyn CatalogSource) -> Result<usize, CatalogError> {
        let items = source.fetch_items().await?;
        for item in &items {
            self.items.insert(item.id, item.clone());
        }
        debug!(count = items.len(), "Refreshed catalog cache");
        Ok(items.len())
    }

    /// Cache a single item (e.g. from a detail fetch).
    pub fn insert(&self, item: CatalogItem) {
        self.items.insert(item.id, item);
    }

    /// Cached item, if present and not expired.
    #[must_use]
    pub fn item(&self, item: ItemId) -> Option<CatalogItem> {
        self.items.get(&item)
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_TTL)
    }
}

impl PriceLookup for CatalogCache {
    fn price(&self, item: ItemId) -> Option<Price> {
        self.items.get(&item).map(|catalog_item| catalog_item.price)
    }
}
