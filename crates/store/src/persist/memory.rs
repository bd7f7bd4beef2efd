//! In-memory persistence backend for tests and previews.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{PersistenceAdapter, PersistenceError};

/// Volatile key-value backend.
///
/// Behaves like [`super::FileStore`] without touching disk. `fail_saves`
/// makes every subsequent `save` return an error, for exercising the
/// swallow-and-log path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle save-failure injection.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Seed a raw blob, bypassing the adapter interface. Lets tests plant
    /// incompatible data for hydration paths.
    pub fn seed(&self, key: &str, value: serde_json::Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value);
        }
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "save failure injected".to_owned(),
            ));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistenceError::Unavailable("poisoned".to_owned()))?;
        entries.insert(key.to_owned(), value.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistenceError::Unavailable("poisoned".to_owned()))?;
        entries.remove(key);
        Ok(())
    }
}
