//! Cart store: reactive state container with storage write-through
//!
//! [`CartStore`] owns the cart. Mutations are synchronous: the in-memory
//! transition and the change notification are complete when the call
//! returns, and the storage write happens later on a background task.
//! The write-through task always persists the newest state, so bursts of
//! mutations coalesce into fewer writes and writes can never land out of
//! order.
//!
//! [`CartHandle`] is the consumer-facing access path: cheap to clone,
//! valid only while the owning store is alive.

use crate::cart::{Cart, NewItem};
use crate::config::{DuplicateAdd, StoreConfig};
use crate::error::{CartError, CartResult};
use crate::storage::{FileStorage, Storage};
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Reactive subscription to the cart state
///
/// `borrow()` yields the current cart; `changed().await` resolves after
/// each effective mutation. Bursts of mutations may be observed as a
/// single change carrying the newest state.
pub type CartWatch = watch::Receiver<Cart>;

/// Request sent to the write-through task by `flush`
struct FlushRequest {
    ack: oneshot::Sender<CartResult<()>>,
}

/// State shared between the store and its handles
struct Shared {
    state: watch::Sender<Cart>,
    ctrl: mpsc::Sender<FlushRequest>,
    duplicate_add: DuplicateAdd,
}

impl Shared {
    fn products(&self) -> Cart {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> CartWatch {
        self.state.subscribe()
    }

    fn add_to_cart(&self, item: NewItem) {
        let id = item.id.clone();
        let changed = self.state.send_if_modified(|cart| {
            if cart.contains(&item.id) {
                match self.duplicate_add {
                    DuplicateAdd::Ignore => false,
                    DuplicateAdd::Increment => cart.increment(&item.id),
                }
            } else {
                cart.add_new(item);
                true
            }
        });

        if changed {
            debug!("Added {} to cart", id);
        }
    }

    fn increment(&self, id: &str) {
        if self.state.send_if_modified(|cart| cart.increment(id)) {
            debug!("Incremented {} in cart", id);
        }
    }

    fn decrement(&self, id: &str) {
        if self.state.send_if_modified(|cart| cart.decrement(id)) {
            debug!("Decremented {} in cart", id);
        }
    }

    async fn flush(&self) -> CartResult<()> {
        let (ack, response) = oneshot::channel();
        self.ctrl
            .send(FlushRequest { ack })
            .await
            .map_err(|_| CartError::StoreClosed)?;
        response.await.map_err(|_| CartError::StoreClosed)?
    }
}

/// Reactive cart store with write-through persistence
///
/// The store is the single owner of the cart and of its persistence. Its
/// lifetime is the access scope for every [`CartHandle`] it hands out:
/// dropping the store invalidates all handles and stops the write-through
/// task.
pub struct CartStore {
    shared: Arc<Shared>,
    writer: JoinHandle<()>,
}

impl CartStore {
    /// Open a store over `storage`, restoring the persisted cart.
    ///
    /// A missing, unreadable, or unparseable blob restores as an empty
    /// cart; none of those conditions is an error.
    pub async fn open(storage: impl Storage + 'static, config: StoreConfig) -> Self {
        let initial = load_cart(&storage, &config.storage_key).await;
        info!("Cart store opened with {} item(s)", initial.len());

        let (state, state_rx) = watch::channel(initial);
        let (ctrl, ctrl_rx) = mpsc::channel(8);

        let writer = tokio::spawn(write_through(
            storage,
            config.storage_key,
            state_rx,
            ctrl_rx,
        ));

        Self {
            shared: Arc::new(Shared {
                state,
                ctrl,
                duplicate_add: config.duplicate_add,
            }),
            writer,
        }
    }

    /// Open a store over [`FileStorage`] at its default directory
    pub async fn open_default(config: StoreConfig) -> Self {
        Self::open(FileStorage::new(), config).await
    }

    /// Get a read-only snapshot of the current cart
    pub fn products(&self) -> Cart {
        self.shared.products()
    }

    /// Subscribe to cart changes
    ///
    /// The receiver starts with the current cart as its seen value; call
    /// `borrow()` for the initial render and `changed().await` for
    /// updates.
    pub fn subscribe(&self) -> CartWatch {
        self.shared.subscribe()
    }

    /// Add an item to the cart with quantity 1.
    ///
    /// An id that is already present is handled per the configured
    /// [`DuplicateAdd`] policy; under the default policy the call is an
    /// observable no-op. No field of the item is validated.
    pub fn add_to_cart(&self, item: NewItem) {
        self.shared.add_to_cart(item);
    }

    /// Raise the quantity of `id` by one; absent ids are a no-op
    pub fn increment(&self, id: &str) {
        self.shared.increment(id);
    }

    /// Lower the quantity of `id` by one, removing the item at zero;
    /// absent ids are a no-op
    pub fn decrement(&self, id: &str) {
        self.shared.decrement(id);
    }

    /// Persist the current cart now and report the storage outcome.
    ///
    /// The automatic write-through stays fire-and-forget; this is the
    /// opt-in way to observe a write failure.
    pub async fn flush(&self) -> CartResult<()> {
        self.shared.flush().await
    }

    /// Get a clonable handle scoped to this store's lifetime
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Flush, then shut the write-through task down and wait for it.
    ///
    /// Dropping the store without `close` is allowed: the task notices
    /// the channels closing and exits, but a write still in flight at
    /// process exit may be lost.
    pub async fn close(self) -> CartResult<()> {
        let Self { shared, writer } = self;
        let result = shared.flush().await;

        // Dropping the shared state closes both channels the task
        // selects on.
        drop(shared);
        let _ = writer.await;

        info!("Cart store closed");
        result
    }
}

/// Clonable, lifetime-scoped access to a [`CartStore`]
///
/// Every operation fails with [`CartError::StoreClosed`] once the owning
/// store has been dropped; a handle must only be used within the store's
/// lifetime.
#[derive(Clone)]
pub struct CartHandle {
    shared: Weak<Shared>,
}

impl CartHandle {
    fn shared(&self) -> CartResult<Arc<Shared>> {
        self.shared.upgrade().ok_or(CartError::StoreClosed)
    }

    /// Get a read-only snapshot of the current cart
    pub fn products(&self) -> CartResult<Cart> {
        Ok(self.shared()?.products())
    }

    /// Subscribe to cart changes
    pub fn subscribe(&self) -> CartResult<CartWatch> {
        Ok(self.shared()?.subscribe())
    }

    /// Add an item to the cart with quantity 1
    pub fn add_to_cart(&self, item: NewItem) -> CartResult<()> {
        self.shared()?.add_to_cart(item);
        Ok(())
    }

    /// Raise the quantity of `id` by one; absent ids are a no-op
    pub fn increment(&self, id: &str) -> CartResult<()> {
        self.shared()?.increment(id);
        Ok(())
    }

    /// Lower the quantity of `id` by one, removing the item at zero;
    /// absent ids are a no-op
    pub fn decrement(&self, id: &str) -> CartResult<()> {
        self.shared()?.decrement(id);
        Ok(())
    }

    /// Persist the current cart now and report the storage outcome
    pub async fn flush(&self) -> CartResult<()> {
        self.shared()?.flush().await
    }
}

/// Restore the persisted cart, treating every failure as an empty cart.
async fn load_cart<S: Storage>(storage: &S, key: &str) -> Cart {
    let blob = match storage.read(key).await {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!("No cart blob at {}, starting empty", key);
            return Cart::default();
        }
        Err(e) => {
            warn!("Failed to read cart blob: {}", e);
            return Cart::default();
        }
    };

    match serde_json::from_str(&blob) {
        Ok(cart) => cart,
        Err(e) => {
            warn!("Failed to parse cart blob: {}", e);
            Cart::default()
        }
    }
}

/// Serialize and write the full cart at `key`
async fn persist<S: Storage>(storage: &S, key: &str, cart: &Cart) -> CartResult<()> {
    let blob = serde_json::to_string(cart)?;
    storage.write(key, &blob).await
}

/// Write-through loop: persist the newest cart after each change.
///
/// Write failures are logged and swallowed; the cart must keep working
/// when storage is unavailable. Flush requests write immediately and
/// report the outcome to the requester. Exits when the store is dropped.
async fn write_through<S: Storage>(
    storage: S,
    key: String,
    mut state: CartWatch,
    mut ctrl: mpsc::Receiver<FlushRequest>,
) {
    loop {
        tokio::select! {
            // Drain state changes before answering a flush, so the ack
            // always reflects a write of the current state.
            biased;

            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                if let Err(e) = persist(&storage, &key, &snapshot).await {
                    warn!("Failed to persist cart: {}", e);
                }
            }

            request = ctrl.recv() => {
                match request {
                    Some(FlushRequest { ack }) => {
                        // borrow_and_update marks the state seen, so the
                        // change arm will not rewrite the same snapshot.
                        let snapshot = state.borrow_and_update().clone();
                        let _ = ack.send(persist(&storage, &key, &snapshot).await);
                    }
                    None => break,
                }
            }
        }
    }
}
