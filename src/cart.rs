//! Cart data model
//!
//! `LineItem` is one product entry with its accumulated quantity; `Cart`
//! is the ordered collection of them. The mutation rules live here as
//! plain synchronous methods so they stay testable without a runtime;
//! [`CartStore`](crate::store::CartStore) wires them to notifications and
//! persistence.

use serde::{Deserialize, Serialize};

/// One product entry in the cart, with its accumulated quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, unique within the cart
    pub id: String,

    /// Display title
    pub title: String,

    /// Image shown next to the line
    pub image_url: String,

    /// Unit price
    pub price: f64,

    /// Number of units, always >= 1 while the item is present
    pub quantity: u32,
}

/// Item descriptor for `add_to_cart`: a [`LineItem`] without a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    /// Product identifier
    pub id: String,

    /// Display title
    pub title: String,

    /// Image shown next to the line
    pub image_url: String,

    /// Unit price
    pub price: f64,
}

impl NewItem {
    /// Create a new item descriptor
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// Ordered collection of line items, insertion order preserved
///
/// Serializes transparently as a bare JSON array of items, which is the
/// exact shape of the persisted blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// All line items in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line item by id
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether an item with this id is in the cart
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Sum of all quantities, for badge-style displays
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Append a new line for `item` with quantity 1.
    ///
    /// The caller decides what to do about an id that is already present;
    /// this method appends unconditionally.
    pub fn add_new(&mut self, item: NewItem) {
        self.items.push(LineItem {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: 1,
        });
    }

    /// Raise the quantity of `id` by one.
    ///
    /// Returns whether anything changed; an absent id changes nothing.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Lower the quantity of `id` by one, removing the line when it would
    /// reach zero.
    ///
    /// Returns whether anything changed; an absent id changes nothing.
    /// Quantity can never go negative because removal happens exactly at
    /// zero.
    pub fn decrement(&mut self, id: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };

        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
        } else {
            self.items.remove(index);
        }
        true
    }
}
