//! In-memory storage for tests and ephemeral carts

use crate::error::CartResult;
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory implementation of [`Storage`].
///
/// Blobs live in a `HashMap` and are lost when the storage is dropped.
/// A counter of completed writes lets tests assert exactly when the
/// store's write-through happened; share the storage behind an `Arc` to
/// keep inspecting it after handing it to a store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed writes since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> CartResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> CartResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> CartResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
