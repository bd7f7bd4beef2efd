//! Dependency-injected assembly of the state layer.
//!
//! One [`Stores`] instance exists per process: constructed at startup,
//! handed to every consumer, disposed at shutdown. Consumers receive it
//! explicitly instead of reaching for ambient globals, which keeps the
//! "single shared instance" semantics without implicit global mutability.

use std::sync::Arc;

use tracing::info;

use crate::cart::CartStore;
use crate::checkout::CheckoutCoordinator;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::persist::{FileStore, MemoryStore, PersistenceAdapter};
use crate::session::SessionStore;

/// The assembled state layer.
///
/// Cheaply cloneable via `Arc`; clones share the same stores.
#[derive(Debug, Clone)]
pub struct Stores {
    inner: Arc<StoresInner>,
}

#[derive(Debug)]
struct StoresInner {
    cart: Arc<CartStore>,
    session: SessionStore,
    checkout: CheckoutCoordinator,
}

impl Stores {
    /// Open the state layer with file-backed persistence under
    /// `config.data_dir`, hydrating both stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created. Hydration
    /// itself never fails; unreadable blobs fall back to defaults.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let adapter: Arc<dyn PersistenceAdapter> =
            Arc::new(FileStore::open(config.data_dir.clone()).await?);
        info!(data_dir = %config.data_dir.display(), "Opening state layer");
        Ok(Self::with_adapter(adapter).await)
    }

    /// Assemble the stores on an explicit persistence backend.
    pub async fn with_adapter(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        let cart = Arc::new(CartStore::hydrate(Arc::clone(&adapter)).await);
        let session = SessionStore::hydrate(adapter).await;
        let checkout = CheckoutCoordinator::new(Arc::clone(&cart));
        Self {
            inner: Arc::new(StoresInner {
                cart,
                session,
                checkout,
            }),
        }
    }

    /// Assemble the stores on volatile storage (tests, previews).
    pub async fn in_memory() -> Self {
        Self::with_adapter(Arc::new(MemoryStore::new())).await
    }

    /// The shopping cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// The session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The checkout coordinator.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutCoordinator {
        &self.inner.checkout
    }

    /// Wait for outstanding snapshots before process exit.
    ///
    /// Optional: abandoning the pumps loses at most the newest snapshot,
    /// and the stores rehydrate from the last one that landed.
    pub async fn shutdown(&self) {
        self.inner.cart.flushed().await;
        self.inner.session.flushed().await;
        info!("State layer flushed");
    }
}
