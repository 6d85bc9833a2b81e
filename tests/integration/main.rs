//! Integration tests for gocart

mod persistence_tests {
    use gocart::{CartError, CartStore, FileStorage, NewItem, StoreConfig};
    use tempfile::TempDir;

    fn item(id: &str, title: &str, price: f64) -> NewItem {
        NewItem::new(id, title, format!("https://img.example/{id}.png"), price)
    }

    async fn open_at(dir: &TempDir) -> CartStore {
        CartStore::open(FileStorage::with_dir(dir.path()), StoreConfig::default()).await
    }

    #[tokio::test]
    async fn restart_restores_cart() {
        let dir = TempDir::new().unwrap();

        let store = open_at(&dir).await;
        store.add_to_cart(item("bana-1", "Banana", 5.5));
        store.add_to_cart(item("appl-1", "Apple", 3.0));
        store.increment("bana-1");
        store.close().await.unwrap();

        let reopened = open_at(&dir).await;
        let products = reopened.products();
        assert_eq!(products.len(), 2);
        assert_eq!(products.get("bana-1").unwrap().quantity, 2);
        assert_eq!(products.get("appl-1").unwrap().quantity, 1);
        assert_eq!(products.items()[0].id, "bana-1");
        assert_eq!(products.total_quantity(), 3);
    }

    #[tokio::test]
    async fn reads_blob_from_other_clients() {
        let dir = TempDir::new().unwrap();
        let blob = r#"[
            {
                "id": "milk-1",
                "title": "Milk",
                "image_url": "https://img.example/milk-1.png",
                "price": 2.25,
                "quantity": 3
            }
        ]"#;
        std::fs::write(dir.path().join("_GoMarketplace_cart.json"), blob).unwrap();

        let store = open_at(&dir).await;
        let products = store.products();
        assert_eq!(products.len(), 1);
        let milk = products.get("milk-1").unwrap();
        assert_eq!(milk.title, "Milk");
        assert_eq!(milk.price, 2.25);
        assert_eq!(milk.quantity, 3);
    }

    #[tokio::test]
    async fn corrupt_blob_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("_GoMarketplace_cart.json"), "{not json").unwrap();

        let store = open_at(&dir).await;
        assert!(store.products().is_empty());

        // The store stays usable and the next write replaces the blob.
        store.add_to_cart(item("bana-1", "Banana", 5.5));
        store.close().await.unwrap();

        let reopened = open_at(&dir).await;
        assert_eq!(reopened.products().len(), 1);
    }

    #[tokio::test]
    async fn first_write_creates_blob() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("_GoMarketplace_cart.json");

        let store = open_at(&dir).await;
        assert!(store.products().is_empty());
        assert!(!path.exists());

        store.add_to_cart(item("bana-1", "Banana", 5.5));
        store.flush().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn flush_reports_storage_failure() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "plain file").unwrap();

        // The storage directory path is occupied by a file, so every
        // write fails while reads see an absent blob.
        let store = CartStore::open(FileStorage::with_dir(&blocked), StoreConfig::default()).await;
        assert!(store.products().is_empty());

        store.add_to_cart(item("bana-1", "Banana", 5.5));
        let err = store.flush().await.unwrap_err();
        assert!(matches!(err, CartError::Io { .. }));

        // The in-memory cart is unaffected by the failure.
        assert_eq!(store.products().len(), 1);
    }
}

mod store_tests {
    use gocart::{
        Cart, CartError, CartStore, MemoryStorage, NewItem, StoreConfig, DEFAULT_STORAGE_KEY,
    };
    use gocart::Storage;
    use std::sync::Arc;

    fn item(id: &str, title: &str, price: f64) -> NewItem {
        NewItem::new(id, title, format!("https://img.example/{id}.png"), price)
    }

    async fn open_memory() -> (Arc<MemoryStorage>, CartStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::open(storage.clone(), StoreConfig::default()).await;
        (storage, store)
    }

    #[tokio::test]
    async fn burst_coalesces_into_one_write() {
        let (storage, store) = open_memory().await;

        store.add_to_cart(item("bana-1", "Banana", 5.5));
        store.add_to_cart(item("appl-1", "Apple", 3.0));
        store.add_to_cart(item("milk-1", "Milk", 2.25));
        store.flush().await.unwrap();

        // One write for the whole burst plus the flush itself.
        assert_eq!(storage.write_count(), 2);

        let blob = storage.read(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        let persisted: Cart = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted.items()[0].id, "bana-1");
        assert_eq!(persisted.items()[2].id, "milk-1");
    }

    #[tokio::test]
    async fn watcher_sees_newest_state_once() {
        let (_storage, store) = open_memory().await;
        let mut watch = store.subscribe();

        store.add_to_cart(item("bana-1", "Banana", 5.5));
        store.increment("bana-1");
        store.add_to_cart(item("appl-1", "Apple", 3.0));

        watch.changed().await.unwrap();
        let cart = watch.borrow().clone();
        assert_eq!(cart.get("bana-1").unwrap().quantity, 2);
        assert_eq!(cart.get("appl-1").unwrap().quantity, 1);

        // The burst collapsed into that single notification.
        assert!(!watch.has_changed().unwrap());
    }

    #[tokio::test]
    async fn handles_share_one_cart() {
        let (_storage, store) = open_memory().await;
        let first = store.handle();
        let second = first.clone();

        first.add_to_cart(item("bana-1", "Banana", 5.5)).unwrap();
        second.increment("bana-1").unwrap();

        let watch = second.subscribe().unwrap();
        assert_eq!(watch.borrow().get("bana-1").unwrap().quantity, 2);

        drop(store);
        assert!(matches!(first.products(), Err(CartError::StoreClosed)));
        assert!(matches!(
            second.add_to_cart(item("appl-1", "Apple", 3.0)),
            Err(CartError::StoreClosed)
        ));
    }

    #[tokio::test]
    async fn checkout_flow_end_to_end() {
        let (storage, store) = open_memory().await;

        store.add_to_cart(item("bana-1", "Banana", 5.5));
        let after_add = store.products();
        assert_eq!(after_add.get("bana-1").unwrap().quantity, 1);

        // Re-adding the same id is ignored under the default policy.
        store.add_to_cart(item("bana-1", "Banana", 5.5));
        assert_eq!(store.products(), after_add);

        store.increment("bana-1");
        store.increment("bana-1");
        assert_eq!(store.products().get("bana-1").unwrap().quantity, 3);

        store.decrement("bana-1");
        store.decrement("bana-1");
        store.decrement("bana-1");
        assert!(store.products().is_empty());

        // Mutating ids that are no longer present changes nothing.
        store.increment("bana-1");
        store.decrement("bana-1");
        assert!(store.products().is_empty());

        store.close().await.unwrap();

        let reopened = CartStore::open(storage, StoreConfig::default()).await;
        assert!(reopened.products().is_empty());
    }
}
