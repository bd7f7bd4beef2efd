//! File-backed persistence: one `<key>.json` per blob under a data
//! directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{PersistenceAdapter, PersistenceError};

/// JSON-file persistence backend.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write leaves the previous blob intact (single-process atomicity;
/// nothing here guards against concurrent processes sharing a directory).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a file store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl PersistenceAdapter for FileStore {
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(value)?;
        let path = self.blob_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(key, bytes = bytes.len(), "Wrote snapshot");
        Ok(())
    }

    async fn load(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.blob_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "No snapshot on disk");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to read snapshot, treating as absent");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Snapshot is not valid JSON, treating as absent");
                None
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match tokio::fs::remove_file(self.blob_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
