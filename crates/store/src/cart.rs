//! Shopping cart store.
//!
//! [`CartStore`] owns the cart lines for the process: one shared instance,
//! hydrated once at startup, mutated through atomic updates, snapshotted
//! to storage after every mutation. All operations are total; invalid
//! input (removing an unknown item, clearing an empty cart) is a no-op.
//!
//! The persisted form is a JSON object keyed by the decimal string of the
//! item id, e.g. `{"1": {"quantity": 2}}`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use niba_vision_core::ItemId;

use crate::catalog::PriceLookup;
use crate::observable::{ObservableContainer, Subscription};
use crate::persist::{PersistenceAdapter, SnapshotWriter, keys};

/// One cart entry: how many copies of an item the user wants.
///
/// Invariant: a line never exists with quantity zero; reaching zero means
/// the line is removed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Number of copies, always >= 1.
    pub quantity: u32,
}

/// The full cart contents: a map from item id to its line.
///
/// An item appears at most once; quantities live on the line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: BTreeMap<ItemId, CartLine>,
}

impl CartState {
    /// All lines, keyed by item id.
    #[must_use]
    pub const fn lines(&self) -> &BTreeMap<ItemId, CartLine> {
        &self.lines
    }

    /// Line for `item`, if present.
    #[must_use]
    pub fn line(&self, item: ItemId) -> Option<CartLine> {
        self.lines.get(&item).copied()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    fn add_one(&mut self, item: ItemId) {
        self.lines
            .entry(item)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(1))
            .or_insert(CartLine { quantity: 1 });
    }

    fn remove(&mut self, item: ItemId) -> bool {
        self.lines.remove(&item).is_some()
    }
}

// The JSON form keys lines by the item id's decimal string (JSON object
// keys must be strings); round-trip is lossless.
impl Serialize for CartState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lines.len()))?;
        for (item, line) in &self.lines {
            map.serialize_entry(&item.to_string(), line)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CartState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CartStateVisitor;

        impl<'de> Visitor<'de> for CartStateVisitor {
            type Value = CartState;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of item id strings to cart lines")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut lines = BTreeMap::new();
                while let Some((key, line)) = access.next_entry::<String, CartLine>()? {
                    let id: i32 = key.parse().map_err(serde::de::Error::custom)?;
                    // Lines that decayed to zero quantity are dropped on
                    // hydration rather than violating the invariant.
                    if line.quantity > 0 {
                        lines.insert(ItemId::new(id), line);
                    }
                }
                Ok(CartState { lines })
            }
        }

        deserializer.deserialize_map(CartStateVisitor)
    }
}

/// The process-wide shopping cart.
///
/// Constructed once via [`CartStore::hydrate`] and shared by reference;
/// every mutation goes through the atomic container, and each mutation
/// hands the resulting state to the background snapshot pump before
/// returning.
#[derive(Debug)]
pub struct CartStore {
    lines: ObservableContainer<CartState>,
    count: ObservableContainer<u32>,
    snapshots: SnapshotWriter,
}

impl CartStore {
    /// Build the store, loading the last persisted cart if one exists.
    ///
    /// A missing, unreadable, or incompatible blob hydrates as an empty
    /// cart; hydration never fails.
    pub async fn hydrate(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        let initial = match adapter.load(keys::CART).await {
            Some(value) => match serde_json::from_value::<CartState>(value) {
                Ok(state) => {
                    debug!(lines = state.lines().len(), "Hydrated cart from snapshot");
                    state
                }
                Err(e) => {
                    warn!(error = %e, "Persisted cart is incompatible, starting empty");
                    CartState::default()
                }
            },
            None => CartState::default(),
        };
        let count = initial.item_count();
        Self {
            lines: ObservableContainer::new(initial),
            count: ObservableContainer::new(count),
            snapshots: SnapshotWriter::spawn(adapter, keys::CART),
        }
    }

    /// Add one copy of `item`: bumps the existing line or inserts a new
    /// line at quantity 1.
    pub fn add(&self, item: ItemId) {
        self.apply(|state| state.add_one(item));
    }

    /// Remove the whole line for `item`. Unknown items are a no-op.
    pub fn remove(&self, item: ItemId) {
        self.apply(|state| {
            if !state.remove(item) {
                debug!(%item, "Remove for item not in cart, ignoring");
            }
        });
    }

    /// Empty the cart. Idempotent.
    pub fn clear(&self) {
        self.apply(|state| *state = CartState::default());
    }

    /// Current cart contents.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.lines.get()
    }

    /// Subscribe to cart contents: current state first, then every change.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<CartState> {
        self.lines.subscribe()
    }

    /// Subscribe to the derived total item count (for the cart badge).
    ///
    /// The count is maintained alongside the lines; consumers never
    /// recompute it.
    #[must_use]
    pub fn item_count(&self) -> Subscription<u32> {
        self.count.subscribe()
    }

    /// Current total item count without subscribing.
    #[must_use]
    pub fn current_count(&self) -> u32 {
        self.count.get()
    }

    /// Sum of `quantity * unit price` over all lines, priced through
    /// `prices`. Items the lookup does not know contribute zero rather
    /// than failing.
    ///
    /// Computed on demand; never persisted.
    pub fn total_price(&self, prices: &impl PriceLookup) -> Decimal {
        self.lines
            .get()
            .lines()
            .iter()
            .map(|(item, line)| {
                prices.price(*item).map_or(Decimal::ZERO, |price| {
                    price.amount * Decimal::from(line.quantity)
                })
            })
            .sum()
    }

    /// Wait for all enqueued snapshots to be handled. Shutdown/test aid;
    /// the mutation path never waits on storage.
    pub async fn flushed(&self) {
        self.snapshots.flushed().await;
    }

    fn apply(&self, f: impl FnOnce(&mut CartState)) {
        // The sequence number and the derived count are produced under the
        // same critical section as the mutation, so snapshot order and
        // count order both match state order.
        let (seq, state) = self.lines.update_and(|state| {
            f(state);
            let snapshot = state.clone();
            self.count.set(snapshot.item_count());
            (self.snapshots.allocate_seq(), snapshot)
        });
        self.snapshots.save(seq, &state);
    }
}
