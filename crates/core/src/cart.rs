//! The shopping cart model: an ordered sequence of line items.
//!
//! All merge and quantity rules live here, in one place, as pure state
//! transitions. The storefront's cart service wraps this model with session
//! gating and snapshot persistence; nothing else in the system mutates
//! line items.
//!
//! # Invariants
//!
//! - Item order is the order products were first added.
//! - `id` is the uniqueness key: adding an id already in the cart merges
//!   quantities, it never creates a duplicate entry.
//! - Quantities are always at least one. [`Cart::set_quantity`] additionally
//!   enforces the item's stock ceiling and ignores out-of-range requests.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product selected into the cart, with the quantity chosen.
///
/// Carries the catalog fields the cart and order submission depend on.
/// `stock` is the availability recorded at the time the item entered the
/// cart and bounds later quantity changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog id of the product. Uniqueness key within the cart.
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units available when the item was added.
    pub stock: u32,
    /// Units selected. Always at least one.
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Outcome of [`Cart::add`], driving the storefront's toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// The product was not in the cart and was appended.
    Added,
    /// The product was already in the cart and its quantity grew.
    QuantityUpdated,
}

/// An ordered cart of line items.
///
/// Serializes transparently as a JSON array of [`LineItem`], which is also
/// the persisted snapshot encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from a persisted snapshot.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Add an item, merging with an existing entry for the same product.
    ///
    /// If the product id is already present, its quantity grows by the
    /// incoming quantity (additive merge, never an overwrite) and the rest
    /// of the entry is left untouched. Otherwise the item is appended.
    /// Incoming quantities below one count as one.
    pub fn add(&mut self, mut item: LineItem) -> CartEvent {
        item.quantity = item.quantity.max(1);

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            CartEvent::QuantityUpdated
        } else {
            self.items.push(item);
            CartEvent::Added
        }
    }

    /// Replace the entry matching `item.id` wholesale.
    ///
    /// No-op when the product is not in the cart. Quantities below one are
    /// raised to one.
    pub fn update(&mut self, mut item: LineItem) {
        item.quantity = item.quantity.max(1);

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            *existing = item;
        }
    }

    /// Remove the entry for `id`. No-op when absent.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|line| line.id != id);
    }

    /// Set the quantity of the entry for `id`, bounded by its stock.
    ///
    /// Applies only when `1 <= quantity <= item.stock`; out-of-range
    /// requests (and unknown ids) are ignored. Returns whether the change
    /// was applied.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        let Some(existing) = self.items.iter_mut().find(|line| line.id == id) else {
            return false;
        };

        if quantity >= 1 && quantity <= existing.stock {
            existing.quantity = quantity;
            true
        } else {
            false
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities across all lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// The entry for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    /// All lines, in first-added order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
