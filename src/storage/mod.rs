//! Local storage backends for the persisted cart blob
//!
//! The [`Storage`] trait stands in for the device's local storage:
//! string keys mapped to string blobs, read and written whole. Backends:
//! - file-per-key on disk for real use
//! - in-memory for tests and ephemeral carts

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::CartResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract key-value storage interface
///
/// Implementations must be safe to move onto the store's write-through
/// task and to share behind an [`Arc`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the blob at `key`, or `None` if the key is absent
    async fn read(&self, key: &str) -> CartResult<Option<String>>;

    /// Write the blob at `key`, replacing any previous value
    async fn write(&self, key: &str, value: &str) -> CartResult<()>;

    /// Remove the blob at `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> CartResult<()>;
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn read(&self, key: &str) -> CartResult<Option<String>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> CartResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &str) -> CartResult<()> {
        (**self).remove(key).await
    }
}
