//! App Context
//!
//! Session-wide state: the cart, store settings, the menu and the signed-in
//! customer. Constructed once and passed to whatever needs it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    cart::{Cart, KeyValueStore, MemoryStore, StorageKey},
    checkout::{CheckoutDraft, CheckoutError, OrderConfirmation, place_order},
    gateway::OrderGateway,
    items::LineItemId,
    products::{Catalog, CatalogError},
    quantity::Quantity,
    settings::{DeliverySettings, StoreSettings},
};

/// The signed-in customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server id
    pub id: u64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Saved delivery address
    #[serde(default)]
    pub default_address: Option<String>,

    /// Saved address latitude
    #[serde(default)]
    pub default_address_latitude: Option<f64>,

    /// Saved address longitude
    #[serde(default)]
    pub default_address_longitude: Option<f64>,
}

/// Session state.
#[derive(Debug)]
pub struct AppContext<S: KeyValueStore = MemoryStore> {
    /// The customer's cart
    pub cart: Cart<S>,

    /// Resolved store settings
    pub settings: StoreSettings,

    /// The menu
    pub catalog: Catalog,

    user: Option<User>,
}

impl<S: KeyValueStore> AppContext<S> {
    /// Build a context, restoring the cart from the store.
    pub fn new(store: S, settings: StoreSettings, catalog: Catalog) -> Self {
        Self {
            cart: Cart::restore(store),
            settings,
            catalog,
            user: None,
        }
    }

    /// Build a context from the order API.
    ///
    /// Unavailable settings fall back to the defaults and an unavailable menu
    /// leaves the catalog empty; both are logged.
    pub async fn load<G>(store: S, gateway: &G) -> Self
    where
        G: OrderGateway + ?Sized,
    {
        let remote = gateway
            .store_settings()
            .await
            .inspect_err(|err| warn!(error = %err, "failed to fetch store settings"))
            .ok();

        let products = gateway.list_products().await.unwrap_or_else(|err| {
            warn!(error = %err, "failed to fetch products");

            Vec::new()
        });

        Self::new(
            store,
            StoreSettings::merge_with_defaults(remote),
            Catalog::new(products),
        )
    }

    /// The signed-in customer, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Record a signed-in customer.
    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Forget the signed-in customer and their token. The cart is kept.
    pub fn sign_out(&mut self) {
        self.user = None;

        if let Err(err) = self.cart.store_mut().remove(StorageKey::AuthToken) {
            warn!(error = %err, "failed to remove auth token");
        }
    }

    /// Settings read by pricing and delivery eligibility.
    #[must_use]
    pub fn delivery(&self) -> DeliverySettings {
        self.settings.delivery()
    }

    /// A checkout form prefilled from the signed-in customer.
    #[must_use]
    pub fn checkout_draft(&self) -> CheckoutDraft {
        CheckoutDraft::for_user(self.user.as_ref())
    }

    /// Add a menu selection to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the product, size or any add-on cannot be
    /// resolved.
    pub fn add_to_cart(
        &mut self,
        product_id: u64,
        size_id: u64,
        addon_ids: &[u64],
        quantity: Quantity,
    ) -> Result<LineItemId, CatalogError> {
        let addition = self
            .catalog
            .product(product_id)?
            .selection(size_id, addon_ids, quantity)?;

        Ok(self.cart.add(addition))
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the order could not be placed.
    pub async fn place_order<G>(
        &mut self,
        draft: &CheckoutDraft,
        gateway: &G,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        G: OrderGateway + ?Sized,
    {
        let settings = self.settings.delivery();

        place_order(&mut self.cart, draft, &settings, self.user.as_ref(), gateway).await
    }

    /// Drop the cart, its subscribers and the signed-in customer.
    pub fn reset(&mut self) {
        self.cart.reset();
        self.user = None;
    }
}
