//! Catalog item model.

use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::price::Price;

/// A book in the catalog.
///
/// Catalog items are produced by the catalog client and are immutable once
/// fetched; the state layer only reads them (identity for cart lines, price
/// for totals, display fields for the UI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog identity.
    pub id: ItemId,
    /// Title shown on cards and in the cart.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Unit price used for cart totals.
    pub price: Price,
    /// Cover image URL, if the catalog has one.
    pub cover_image_url: Option<String>,
    /// Whether the item carries the "new arrival" badge.
    #[serde(default)]
    pub is_new: bool,
}
