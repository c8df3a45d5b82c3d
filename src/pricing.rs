//! Pricing
//!
//! Derived cart totals. Nothing here is stored; every value is recomputed from the
//! current lines.

use crate::{checkout::OrderType, items::LineItem, prices::Price, settings::DeliverySettings};

/// Total number of units across all lines.
pub fn item_count(items: &[LineItem]) -> u32 {
    items.iter().map(|item| item.quantity.get()).sum()
}

/// Sum of `unit price × quantity` across all lines.
pub fn subtotal(items: &[LineItem]) -> Price {
    items.iter().map(LineItem::line_total).sum()
}

/// Delivery fee shown while browsing: nothing for an empty cart, otherwise the
/// configured fee.
pub fn cart_delivery_fee(items: &[LineItem], settings: &DeliverySettings) -> Price {
    if items.is_empty() {
        Price::ZERO
    } else {
        settings.fee_amount
    }
}

/// Delivery fee charged at checkout: collection orders never pay delivery.
pub fn checkout_delivery_fee(order_type: OrderType, settings: &DeliverySettings) -> Price {
    match order_type {
        OrderType::Delivery => settings.fee_amount,
        OrderType::Collection => Price::ZERO,
    }
}

/// A snapshot of the derived cart figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Number of units in the cart
    pub item_count: u32,

    /// Sum of line totals
    pub subtotal: Price,

    /// Delivery fee
    pub delivery_fee: Price,

    /// Subtotal plus delivery fee
    pub total: Price,
}

impl Totals {
    /// Totals for browsing the cart.
    pub fn for_cart(items: &[LineItem], settings: &DeliverySettings) -> Self {
        Self::with_fee(items, cart_delivery_fee(items, settings))
    }

    /// Totals for a checkout of the given order type.
    pub fn for_checkout(
        items: &[LineItem],
        order_type: OrderType,
        settings: &DeliverySettings,
    ) -> Self {
        Self::with_fee(items, checkout_delivery_fee(order_type, settings))
    }

    fn with_fee(items: &[LineItem], delivery_fee: Price) -> Self {
        let subtotal = subtotal(items);

        Self {
            item_count: item_count(items),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}
