//! Unified error handling for the state layer.
//!
//! Only construction can fail: once the stores exist, every mutation is
//! total and persistence failures degrade to logged no-ops.

use thiserror::Error;

use crate::config::ConfigError;
use crate::persist::PersistenceError;

/// Errors opening the state layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The persistence backend could not be opened.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
