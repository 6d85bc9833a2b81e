//! gocart - Persistent shopping-cart state store
//!
//! Keeps a storefront cart in memory, notifies subscribers on every
//! change, and writes the full cart through to local storage in the
//! background. Restores the persisted cart on open; a missing or corrupt
//! blob restores as an empty cart.
//!
//! ```rust,ignore
//! use gocart::{CartStore, NewItem, StoreConfig};
//!
//! let store = CartStore::open_default(StoreConfig::default()).await;
//! let mut watch = store.subscribe();
//!
//! store.add_to_cart(NewItem::new("bana-1", "Banana", "https://img/banana.png", 5.5));
//! store.increment("bana-1");
//!
//! watch.changed().await?;
//! assert_eq!(watch.borrow().total_quantity(), 2);
//!
//! store.close().await?;
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use cart::{Cart, LineItem, NewItem};
pub use config::{DuplicateAdd, StoreConfig, DEFAULT_STORAGE_KEY};
pub use error::{CartError, CartResult};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{CartHandle, CartStore, CartWatch};
