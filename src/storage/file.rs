//! File-backed storage
//!
//! One file per key under a single directory. Keys are sanitized into
//! file names, so storage keys are not restricted to path-safe
//! characters.

use crate::error::{CartError, CartResult};
use crate::storage::Storage;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-per-key storage backend
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at the default directory
    pub fn new() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }

    /// Create a storage rooted at a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the default storage directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gocart")
    }

    /// Get the directory this storage writes under
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a storage key into a safe file name.
///
/// Any character outside `[A-Za-z0-9._-]` becomes `_`, so keys such as
/// `@GoMarketplace:cart` map to a stable name on every platform.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> CartResult<Option<String>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| CartError::io(format!("reading {}", path.display()), e))?;

        Ok(Some(content))
    }

    async fn write(&self, key: &str, value: &str) -> CartResult<()> {
        let path = self.path_for(key);

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CartError::io("creating storage directory", e))?;
        }

        fs::write(&path, value)
            .await
            .map_err(|e| CartError::io(format!("writing {}", path.display()), e))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> CartResult<()> {
        let path = self.path_for(key);

        if path.exists() {
            fs::remove_file(&path)
                .await
                .map_err(|e| CartError::io(format!("removing {}", path.display()), e))?;
        }

        Ok(())
    }
}
