//! Cart change notifications

use crate::items::{LineItem, LineItemId};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was appended.
    Added(LineItemId),

    /// An existing line absorbed an add and its quantity changed.
    Merged(LineItemId),

    /// A line's quantity was set.
    QuantityChanged(LineItemId),

    /// A line was removed.
    Removed(LineItemId),

    /// All lines were removed.
    Cleared,
}

/// Receives the cart's lines after every change.
pub trait CartObserver {
    /// Called once per effective mutation, after the change has been applied.
    fn cart_changed(&mut self, event: &CartEvent, items: &[LineItem]);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent, &[LineItem]),
{
    fn cart_changed(&mut self, event: &CartEvent, items: &[LineItem]) {
        self(event, items);
    }
}

/// Observer that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn cart_changed(&mut self, _event: &CartEvent, _items: &[LineItem]) {}
}
