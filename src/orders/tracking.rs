//! Order tracking
//!
//! Polls the order API for a single order until it reaches a terminal status or
//! the observer asks to stop.

use std::{ops::ControlFlow, time::Duration};

use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::{
    gateway::{GatewayError, OrderGateway},
    orders::{ApiOrder, Progress},
};

/// Time between polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingUpdate {
    /// The order was fetched.
    Order {
        /// The order as returned by the server
        order: Box<ApiOrder>,

        /// The order's place on the timeline
        progress: Progress,
    },

    /// No order has this number.
    NotFound,

    /// The fetch failed; the message is suitable for the customer.
    Failed(String),
}

/// Receives each poll result and decides whether polling continues.
pub trait TrackingObserver {
    /// Handle a poll result.
    fn update(&mut self, update: TrackingUpdate) -> ControlFlow<()>;
}

impl<F> TrackingObserver for F
where
    F: FnMut(TrackingUpdate) -> ControlFlow<()>,
{
    fn update(&mut self, update: TrackingUpdate) -> ControlFlow<()> {
        self(update)
    }
}

/// Polls one order.
#[derive(Debug)]
pub struct OrderTracker<'a, G: ?Sized> {
    gateway: &'a G,
    order_number: String,
    interval: Duration,
}

impl<'a, G> OrderTracker<'a, G>
where
    G: OrderGateway + ?Sized,
{
    /// Track the given order, polling every [`POLL_INTERVAL`].
    pub fn new(gateway: &'a G, order_number: impl Into<String>) -> Self {
        Self {
            gateway,
            order_number: order_number.into(),
            interval: POLL_INTERVAL,
        }
    }

    /// Use a different poll interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The order being tracked.
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    /// Fetch the order once.
    pub async fn poll(&self) -> TrackingUpdate {
        match self.gateway.get_order(&self.order_number).await {
            Ok(order) => {
                let progress = Progress::for_order(&order);

                TrackingUpdate::Order {
                    order: Box::new(order),
                    progress,
                }
            }
            Err(GatewayError::NotFound) => TrackingUpdate::NotFound,
            Err(err) => TrackingUpdate::Failed(err.user_message()),
        }
    }

    /// Poll immediately and then once per interval, handing every result to the
    /// observer.
    ///
    /// Each fetch completes before the next tick is awaited, so polls never
    /// overlap; ticks missed during a slow fetch are skipped. Stops once the order
    /// is delivered or cancelled, or when the observer breaks.
    ///
    /// Returns the number of polls made.
    pub async fn run(&self, mut observer: impl TrackingObserver) -> u32 {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut polls = 0;

        loop {
            ticker.tick().await;
            polls += 1;

            debug!(order_number = %self.order_number, polls, "polling order");

            let update = self.poll().await;
            let terminal = matches!(
                &update,
                TrackingUpdate::Order { order, .. } if order.status.is_terminal()
            );

            if observer.update(update).is_break() || terminal {
                break;
            }
        }

        polls
    }
}
