//! Placing an order

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, KeyValueStore},
    checkout::{AssembleError, CheckoutDraft, FieldErrors, ProfileUpdate, assemble},
    context::User,
    gateway::{GatewayError, OrderGateway},
    orders::ApiOrder,
    settings::DeliverySettings,
};

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// One or more form fields are invalid.
    #[error("invalid checkout details: {0}")]
    Validation(FieldErrors),

    /// The cart could not be turned into an order.
    #[error(transparent)]
    Assemble(AssembleError),

    /// The order API failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<AssembleError> for CheckoutError {
    fn from(err: AssembleError) -> Self {
        match err {
            AssembleError::Validation(errors) => CheckoutError::Validation(errors),
            other @ AssembleError::MissingSizeRef(_) => CheckoutError::Assemble(other),
        }
    }
}

impl CheckoutError {
    /// The single message shown to the customer, for errors that are not tied to
    /// a form field.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Your cart is empty".to_string(),
            CheckoutError::Validation(_) => "Please correct the highlighted fields".to_string(),
            CheckoutError::Assemble(_) => "Something went wrong".to_string(),
            CheckoutError::Gateway(err) => err.user_message(),
        }
    }
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Number used to track the order
    pub order_number: String,

    /// The order as created by the server
    pub order: ApiOrder,
}

/// Validate the draft, submit the order and empty the cart.
///
/// If the customer asked to save their address and is signed in, their profile
/// is updated after the order is placed. A failed profile update is logged and
/// does not fail the order.
///
/// # Errors
///
/// Returns a [`CheckoutError`] if the cart is empty, the draft is invalid, or
/// the order API fails. The cart is left untouched on error.
#[tracing::instrument(skip_all, fields(order_type = ?draft.order_type, lines = cart.items().len()))]
pub async fn place_order<S, G>(
    cart: &mut Cart<S>,
    draft: &CheckoutDraft,
    settings: &DeliverySettings,
    user: Option<&User>,
    gateway: &G,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: KeyValueStore,
    G: OrderGateway + ?Sized,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let assembled = assemble(cart.items(), draft, settings)?;
    let order = gateway.create_order(&assembled.submission).await?;

    if draft.save_address && user.is_some() {
        let update = ProfileUpdate::default_address(
            draft.delivery_address.clone(),
            draft.delivery_latitude,
            draft.delivery_longitude,
        );

        if let Err(err) = gateway.update_profile(&update).await {
            warn!(error = %err, "failed to save default address");
        }
    }

    cart.clear();

    info!(
        order_number = %order.order_number,
        total = %assembled.totals.total,
        "order placed"
    );

    Ok(OrderConfirmation {
        order_number: order.order_number.clone(),
        order,
    })
}
