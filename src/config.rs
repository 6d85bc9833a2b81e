//! Store configuration
//!
//! `StoreConfig` is built in code by the embedding application; there is
//! no config file and no environment lookup.

/// Default storage key for the persisted cart blob.
///
/// Kept identical to the key the GoMarketplace mobile app writes, so an
/// existing on-device cart is picked up as-is.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:cart";

/// What `add_to_cart` does when the item id is already in the cart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateAdd {
    /// Leave the existing line untouched; the call is an observable no-op
    /// (no notification, no storage write)
    #[default]
    Ignore,

    /// Bump the existing line's quantity by one, as if `increment` had
    /// been called with that id
    Increment,
}

/// Cart store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage key under which the serialized cart lives
    pub storage_key: String,

    /// Behavior when adding an id that is already present
    pub duplicate_add: DuplicateAdd,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            duplicate_add: DuplicateAdd::Ignore,
        }
    }
}
