//! Bites prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartEvent, CartObserver, KeyValueStore, MemoryStore, NoopObserver, StorageError,
        StorageKey,
    },
    checkout::{
        AssembleError, AssembledOrder, CheckoutDraft, CheckoutError, Field, FieldErrors,
        OrderConfirmation, OrderSubmission, OrderType, PaymentMethod, ProfileUpdate, assemble,
        place_order,
    },
    context::{AppContext, User},
    delivery::{Coordinates, Eligibility, OrderTypeSelector, haversine_km},
    fixtures::{Fixture, FixtureError},
    gateway::{GatewayError, OrderGateway},
    items::{LineItem, LineItemId},
    orders::{
        ApiOrder, OrderPage, OrderStatus, OrderTracker, Progress, ProgressStep, TrackingObserver,
        TrackingUpdate,
    },
    prices::{Price, PriceError, format_price},
    pricing::Totals,
    products::{AddOn, CartAddition, Catalog, CatalogError, Product, ProductSize, Size},
    quantity::{MAX_QUANTITY, MIN_QUANTITY, Quantity},
    receipt::{Receipt, ReceiptError},
    settings::{DeliverySettings, RemoteSettings, SettingsError, StoreSettings},
};
