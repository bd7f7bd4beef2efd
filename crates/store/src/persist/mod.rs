//! Best-effort durable snapshot storage.
//!
//! Stores write their state out as named JSON blobs through a
//! [`PersistenceAdapter`]. Persistence is advisory: save failures are
//! logged and swallowed, unreadable blobs hydrate as "absent", and the
//! in-memory store stays authoritative for the running process.
//!
//! The background write path lives in [`snapshot`]: one sequenced pump per
//! store, so snapshots land in mutation order and a stale snapshot can
//! never overwrite a newer one.

pub mod file;
pub mod memory;
pub mod snapshot;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot::SnapshotWriter;

/// Blob names used by the state layer.
pub mod keys {
    /// Serialized [`crate::cart::CartState`].
    pub const CART: &str = "cart";
    /// Serialized profile of the logged-in user.
    pub const SESSION: &str = "session";
}

/// Errors from a persistence backend.
///
/// These never cross the store API boundary; the snapshot pump logs and
/// swallows them.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend is unavailable (used by test doubles to exercise the
    /// swallow-and-log path).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A process-scoped durable key-value namespace for serialized state.
///
/// `load` never fails: a missing, unreadable, or corrupt blob is reported
/// as `None` so callers always have a safe default to fall back to.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Write `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot complete the write. Callers
    /// treat this as advisory.
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PersistenceError>;

    /// Read the blob stored under `key`, or `None` if absent or unreadable.
    async fn load(&self, key: &str) -> Option<serde_json::Value>;

    /// Delete the blob stored under `key`. Deleting an absent key is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot complete the delete.
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
