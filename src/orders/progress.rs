//! Order progress
//!
//! Projects an order status onto the tracking timeline.

use crate::orders::{ApiOrder, OrderStatus};

/// One step of the tracking timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    /// Status this step stands for
    pub status: OrderStatus,

    /// Step label
    pub label: &'static str,

    /// The order has reached this step
    pub completed: bool,

    /// The order is currently at this step
    pub in_progress: bool,
}

/// Where an order stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The order is moving along the timeline.
    Active {
        /// Every step of the timeline
        steps: Vec<ProgressStep>,

        /// The status the order is at
        current: OrderStatus,
    },

    /// The order was cancelled. Shown as a notice instead of a timeline.
    Cancelled {
        /// Reason left by the store, if any
        reason: Option<String>,
    },
}

impl Progress {
    /// Project a status onto the timeline.
    ///
    /// Steps up to and including the current one are completed. The current step is
    /// in progress unless the order has been delivered.
    #[must_use]
    pub fn project(status: OrderStatus) -> Self {
        let Some(index) = status.position() else {
            return Progress::Cancelled { reason: None };
        };

        let steps = OrderStatus::PROGRESSION
            .iter()
            .enumerate()
            .map(|(position, step)| ProgressStep {
                status: *step,
                label: step.step_label(),
                completed: position <= index,
                in_progress: position == index && status != OrderStatus::Delivered,
            })
            .collect();

        Progress::Active {
            steps,
            current: status,
        }
    }

    /// Progress of an order, including the cancellation reason from its history.
    #[must_use]
    pub fn for_order(order: &ApiOrder) -> Self {
        match Self::project(order.status) {
            Progress::Cancelled { .. } => Progress::Cancelled {
                reason: order.cancellation_reason().map(str::to_string),
            },
            active @ Progress::Active { .. } => active,
        }
    }

    /// Check if the order was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Progress::Cancelled { .. })
    }

    /// The timeline; empty for a cancelled order.
    #[must_use]
    pub fn steps(&self) -> &[ProgressStep] {
        match self {
            Progress::Active { steps, .. } => steps,
            Progress::Cancelled { .. } => &[],
        }
    }
}
