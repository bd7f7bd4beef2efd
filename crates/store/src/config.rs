//! State-layer configuration.
//!
//! # Environment Variables
//!
//! - `NIBA_DATA_DIR` - Directory for persisted state blobs (required by
//!   [`StoreConfig::from_env`]; embedders that own their paths use
//!   [`StoreConfig::new`] instead)

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "NIBA_DATA_DIR";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// State-layer configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory where snapshot blobs are stored.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Configuration rooted at an explicit data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `NIBA_DATA_DIR` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var(ENV_DATA_DIR)
            .map_err(|_| ConfigError::MissingEnvVar(ENV_DATA_DIR.to_owned()))?;
        if data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                ENV_DATA_DIR.to_owned(),
                "must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            data_dir: PathBuf::from(data_dir),
        })
    }
}
