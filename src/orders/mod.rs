//! Orders
//!
//! Orders as returned by the order API, and their status.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{checkout::OrderType, prices::Price};

pub mod progress;
pub mod tracking;

pub use progress::{Progress, ProgressStep};
pub use tracking::{OrderTracker, POLL_INTERVAL, TrackingObserver, TrackingUpdate};

/// Lifecycle of an order. Transitions happen on the server only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received, not yet confirmed
    Pending,

    /// Accepted by the store
    Confirmed,

    /// Being prepared
    Preparing,

    /// Ready to be collected
    Ready,

    /// With the driver
    OutForDelivery,

    /// Handed over
    Delivered,

    /// Cancelled by the store
    Cancelled,
}

impl OrderStatus {
    /// The forward path every order follows unless cancelled.
    pub const PROGRESSION: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Status label used in lists and badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready for Pickup",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Label of the tracking step for this status.
    #[must_use]
    pub const fn step_label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Placed",
            other => other.label(),
        }
    }

    /// Index along [`OrderStatus::PROGRESSION`]; `None` when cancelled.
    #[must_use]
    pub fn position(self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|status| *status == self)
    }

    /// Check if no further transitions can happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An order as returned by the order API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOrder {
    /// Server id
    pub id: u64,

    /// Customer-facing order number
    pub order_number: String,

    /// Customer's name
    pub customer_name: String,

    /// Customer's phone number
    pub customer_phone: String,

    /// Delivery or contact address
    pub delivery_address: String,

    /// Address latitude
    #[serde(default)]
    pub delivery_latitude: Option<f64>,

    /// Address longitude
    #[serde(default)]
    pub delivery_longitude: Option<f64>,

    /// Delivery or collection, when reported
    #[serde(default)]
    pub order_type: Option<OrderType>,

    /// Sum of line totals
    pub subtotal: Price,

    /// Delivery fee charged
    pub delivery_fee: Price,

    /// Amount payable
    pub total: Price,

    /// Current status
    pub status: OrderStatus,

    /// Server-rendered status label
    pub status_label: String,

    /// Payment method code
    pub payment_method: String,

    /// Server-rendered payment method label
    pub payment_method_label: String,

    /// Customer's notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Expected hand-over time
    #[serde(default)]
    pub estimated_delivery_at: Option<Timestamp>,

    /// When the order was placed
    pub created_at: Timestamp,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<ApiOrderItem>,

    /// Status changes, oldest first
    #[serde(default)]
    pub status_history: Vec<ApiOrderStatusHistory>,
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOrderItem {
    /// Server id
    pub id: u64,

    /// Product name at the time of ordering
    pub product_name: String,

    /// Size label
    pub size: String,

    /// Number of units
    pub quantity: u32,

    /// Price of one unit
    pub unit_price: Price,

    /// Price of the whole line
    pub total_price: Price,
}

/// A recorded status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOrderStatusHistory {
    /// Status entered
    pub status: OrderStatus,

    /// Server-rendered status label
    pub status_label: String,

    /// Reason or remark left by the store
    #[serde(default)]
    pub notes: Option<String>,

    /// When the change happened
    pub created_at: Timestamp,
}

impl ApiOrder {
    /// Notes of the most recent cancellation, if any.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.status_history
            .iter()
            .rev()
            .find(|entry| entry.status == OrderStatus::Cancelled)
            .and_then(|entry| entry.notes.as_deref())
            .filter(|notes| !notes.trim().is_empty())
    }
}

/// Pagination details of an order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page returned, starting at 1
    pub current_page: u32,

    /// Last available page
    pub last_page: u32,

    /// Number of orders across all pages
    pub total: u32,
}

/// A page of the customer's orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    /// Orders on this page
    #[serde(rename = "data", alias = "orders")]
    pub orders: Vec<ApiOrder>,

    /// Pagination details
    pub meta: PageMeta,
}

impl OrderPage {
    /// Check if there are further pages to load.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.meta.current_page < self.meta.last_page
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_use_snake_case() -> TestResult {
        assert_eq!(
            serde_json::from_value::<OrderStatus>(json!("out_for_delivery"))?,
            OrderStatus::OutForDelivery
        );
        assert_eq!(serde_json::to_value(OrderStatus::Ready)?, json!("ready"));

        Ok(())
    }

    #[test]
    fn labels() {
        assert_eq!(OrderStatus::Pending.label(), "Pending");
        assert_eq!(OrderStatus::Pending.step_label(), "Order Placed");
        assert_eq!(OrderStatus::Ready.step_label(), "Ready for Pickup");
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn cancelled_has_no_position() {
        assert_eq!(OrderStatus::Pending.position(), Some(0));
        assert_eq!(OrderStatus::Delivered.position(), Some(5));
        assert_eq!(OrderStatus::Cancelled.position(), None);
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn deserialises_api_order() -> TestResult {
        let order: ApiOrder = serde_json::from_value(json!({
            "id": 42,
            "order_number": "KB-1042",
            "customer_name": "Thandi",
            "customer_phone": "0821234567",
            "delivery_address": "12 Main Road, Mdantsane",
            "delivery_latitude": null,
            "delivery_longitude": null,
            "subtotal": 90,
            "delivery_fee": "30.00",
            "total": 120.0,
            "status": "preparing",
            "status_label": "Preparing",
            "payment_method": "cash",
            "payment_method_label": "Cash",
            "notes": null,
            "estimated_delivery_at": "2026-03-01T12:45:00Z",
            "created_at": "2026-03-01T12:00:00.000000Z",
            "items": [{
                "id": 1,
                "product_name": "Large Fries",
                "size": "large",
                "quantity": 2,
                "unit_price": 45,
                "total_price": 90
            }],
            "status_history": [{
                "status": "pending",
                "status_label": "Pending",
                "notes": null,
                "created_at": "2026-03-01T12:00:00Z"
            }]
        }))?;

        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.total, Price::from_rand(120));
        assert_eq!(
            order.items.first().map(|item| item.total_price),
            Some(Price::from_rand(90))
        );
        assert!(order.estimated_delivery_at.is_some());

        Ok(())
    }

    #[test]
    fn cancellation_reason_uses_latest_entry() {
        let mut order = test_support::order(OrderStatus::Cancelled);
        let entry = |notes: Option<&str>| ApiOrderStatusHistory {
            status: OrderStatus::Cancelled,
            status_label: "Cancelled".to_string(),
            notes: notes.map(str::to_string),
            created_at: Timestamp::UNIX_EPOCH,
        };
        order.status_history = vec![entry(Some("Out of stock")), entry(Some("Store closed early"))];

        assert_eq!(order.cancellation_reason(), Some("Store closed early"));

        order.status_history = vec![entry(None)];
        assert_eq!(order.cancellation_reason(), None);
    }

    #[test]
    fn page_knows_when_more_remain() {
        let page = |current_page, last_page| OrderPage {
            orders: Vec::new(),
            meta: PageMeta {
                current_page,
                last_page,
                total: 0,
            },
        };

        assert!(page(1, 3).has_more());
        assert!(!page(3, 3).has_more());
    }
}
