//! Cart

use std::fmt;

use tracing::warn;

use crate::{
    items::{LineItem, LineItemId, addon_signature},
    prices::Price,
    pricing::{self, Totals},
    products::CartAddition,
    quantity::Quantity,
    settings::DeliverySettings,
};

pub mod observer;
pub mod storage;

pub use observer::{CartEvent, CartObserver, NoopObserver};
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageKey};

/// The customer's cart.
///
/// Every operation is total: unknown ids are ignored and quantities are clamped
/// rather than rejected. Each effective change is written to the store and then
/// reported to subscribers. A failed write is logged and the in-memory change is
/// kept.
pub struct Cart<S: KeyValueStore = MemoryStore> {
    items: Vec<LineItem>,
    store: S,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<S: KeyValueStore> fmt::Debug for Cart<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> Cart<S> {
    /// Create an empty cart backed by the given store, ignoring anything already
    /// persisted.
    pub fn new(store: S) -> Self {
        Self {
            items: Vec::new(),
            store,
            observers: Vec::new(),
        }
    }

    /// Restore the cart from the store.
    ///
    /// An unreadable snapshot is logged and the session continues with an empty,
    /// in-memory cart.
    pub fn restore(store: S) -> Self {
        let items = storage::load_snapshot(&store).unwrap_or_else(|err| {
            warn!(error = %err, "failed to restore cart, starting empty");

            Vec::new()
        });

        Self {
            items,
            store,
            observers: Vec::new(),
        }
    }

    /// Register an observer for subsequent changes.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add a selection to the cart.
    ///
    /// If a line with the same name, size and add-ons exists, only its quantity
    /// grows (up to the maximum); its price and add-ons stay as first added.
    /// Otherwise a new line is appended.
    ///
    /// Returns the id of the line that now holds the selection.
    pub fn add(&mut self, addition: CartAddition) -> LineItemId {
        let signature = addon_signature(&addition.addons);

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.matches(&addition.name, addition.size, &signature))
        {
            existing.quantity = existing.quantity.saturating_add(addition.quantity);

            let id = existing.id.clone();
            self.changed(CartEvent::Merged(id.clone()));

            return id;
        }

        let unit_price = addition.unit_price();
        let id = LineItemId::generate();

        self.items.push(LineItem {
            id: id.clone(),
            product_id: addition
                .size_ref
                .map_or_else(|| id.to_string(), |size_ref| size_ref.to_string()),
            size_ref: addition.size_ref,
            name: addition.name,
            size: addition.size,
            quantity: addition.quantity,
            unit_price,
            addons: addition.addons,
            image_url: addition.image_url,
        });

        self.changed(CartEvent::Added(id.clone()));

        id
    }

    /// Set a line's quantity.
    ///
    /// Below the minimum the line is removed; above the maximum it is clamped.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &LineItemId, quantity: i64) {
        let Some(quantity) = Quantity::new(quantity) else {
            self.remove(id);

            return;
        };

        let Some(item) = self.items.iter_mut().find(|item| item.id == *id) else {
            return;
        };

        item.quantity = quantity;

        self.changed(CartEvent::QuantityChanged(id.clone()));
    }

    /// Add one unit to a line.
    pub fn increment(&mut self, id: &LineItemId) {
        if let Some(item) = self.get(id) {
            let next = i64::from(item.quantity.get()) + 1;

            self.update_quantity(id, next);
        }
    }

    /// Take one unit from a line, removing it when it would fall below the minimum.
    pub fn decrement(&mut self, id: &LineItemId) {
        if let Some(item) = self.get(id) {
            let next = i64::from(item.quantity.get()) - 1;

            self.update_quantity(id, next);
        }
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn remove(&mut self, id: &LineItemId) {
        let len_before = self.items.len();

        self.items.retain(|item| item.id != *id);

        if self.items.len() < len_before {
            self.changed(CartEvent::Removed(id.clone()));
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();

        self.changed(CartEvent::Cleared);
    }

    /// Drop all lines, subscribers and the persisted snapshot.
    pub fn reset(&mut self) {
        self.items.clear();
        self.observers.clear();

        if let Err(err) = self.store.remove(StorageKey::Cart) {
            warn!(error = %err, "failed to remove persisted cart");
        }
    }

    /// Look up a line.
    #[must_use]
    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// The lines, in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total number of units.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        pricing::item_count(&self.items)
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        pricing::subtotal(&self.items)
    }

    /// Delivery fee: nothing for an empty cart, otherwise the configured fee.
    #[must_use]
    pub fn delivery_fee(&self, settings: &DeliverySettings) -> Price {
        pricing::cart_delivery_fee(&self.items, settings)
    }

    /// Subtotal plus delivery fee.
    #[must_use]
    pub fn total(&self, settings: &DeliverySettings) -> Price {
        self.subtotal() + self.delivery_fee(settings)
    }

    /// All derived figures at once.
    #[must_use]
    pub fn totals(&self, settings: &DeliverySettings) -> Totals {
        Totals::for_cart(&self.items, settings)
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The backing store, for keys the cart does not own.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn changed(&mut self, event: CartEvent) {
        if let Err(err) = storage::save_snapshot(&mut self.store, &self.items) {
            warn!(error = %err, "failed to persist cart");
        }

        for observer in &mut self.observers {
            observer.cart_changed(&event, &self.items);
        }
    }
}

impl Default for Cart<MemoryStore> {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}
