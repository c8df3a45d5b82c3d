//! Checkout
//!
//! Turns the cart and the customer's form into an order submission.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    context::User,
    delivery::Coordinates,
    items::{LineItem, LineItemId},
    pricing::Totals,
    settings::DeliverySettings,
};

pub mod flow;
pub mod submission;
pub mod validation;

pub use flow::{CheckoutError, OrderConfirmation, place_order};
pub use submission::{OrderSubmission, ProfileUpdate, SubmissionLine};
pub use validation::{Field, FieldErrors};

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Delivered to the customer's address
    #[default]
    Delivery,

    /// Collected at the store
    Collection,
}

impl OrderType {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OrderType::Delivery => "Delivery",
            OrderType::Collection => "Collection",
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery or collection
    #[default]
    Cash,

    /// Card on delivery or collection
    Card,
}

/// Errors raised while assembling an order.
#[derive(Debug, Error, PartialEq)]
pub enum AssembleError {
    /// One or more form fields are invalid.
    #[error("invalid checkout details: {0}")]
    Validation(FieldErrors),

    /// A cart line was added without a catalog size reference.
    #[error("cart line {0} has no product size reference")]
    MissingSizeRef(LineItemId),
}

/// The customer's checkout form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutDraft {
    /// Customer's full name
    pub customer_name: String,

    /// Customer's phone number
    pub phone_number: String,

    /// Delivery or contact address
    pub delivery_address: String,

    /// Address latitude, when the address was picked on a map
    pub delivery_latitude: Option<f64>,

    /// Address longitude, when the address was picked on a map
    pub delivery_longitude: Option<f64>,

    /// Free-form notes for the kitchen or driver
    pub special_instructions: Option<String>,

    /// Delivery or collection
    pub order_type: OrderType,

    /// Cash or card
    pub payment_method: PaymentMethod,

    /// Store the address as the customer's default after ordering
    pub save_address: bool,
}

impl CheckoutDraft {
    /// A draft prefilled from the signed-in customer's profile.
    #[must_use]
    pub fn for_user(user: Option<&User>) -> Self {
        let Some(user) = user else {
            return Self::default();
        };

        Self {
            customer_name: user.name.clone(),
            phone_number: user.phone.clone().unwrap_or_default(),
            delivery_address: user.default_address.clone().unwrap_or_default(),
            delivery_latitude: user.default_address_latitude,
            delivery_longitude: user.default_address_longitude,
            ..Self::default()
        }
    }

    /// Replace the address and its coordinates together.
    pub fn set_address(&mut self, address: impl Into<String>, coordinates: Option<Coordinates>) {
        self.delivery_address = address.into();
        self.delivery_latitude = coordinates.map(|c| c.latitude);
        self.delivery_longitude = coordinates.map(|c| c.longitude);
    }

    /// Coordinates of the address, when both are known.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.delivery_latitude, self.delivery_longitude)
    }

    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the [`FieldErrors`] for every field that failed.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validation::validate(self)
    }

    fn notes(&self) -> Option<String> {
        self.special_instructions
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string)
    }
}

/// A validated submission with the totals it was priced at.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledOrder {
    /// Body to send to the order API
    pub submission: OrderSubmission,

    /// Totals shown to the customer
    pub totals: Totals,
}

/// Validate the draft and build the order submission for the given lines.
///
/// The caller is responsible for rejecting an empty cart.
///
/// # Errors
///
/// Returns [`AssembleError::Validation`] with every failing field, or
/// [`AssembleError::MissingSizeRef`] if a line has no catalog size reference.
pub fn assemble(
    items: &[LineItem],
    draft: &CheckoutDraft,
    settings: &DeliverySettings,
) -> Result<AssembledOrder, AssembleError> {
    draft.validate().map_err(AssembleError::Validation)?;

    let line_items = items
        .iter()
        .map(|item| {
            let size_ref = item
                .size_ref
                .ok_or_else(|| AssembleError::MissingSizeRef(item.id.clone()))?;

            Ok(SubmissionLine {
                size_ref,
                quantity: item.quantity.get(),
                addon_ids: item.addon_ids().collect::<SmallVec<[u64; 4]>>(),
            })
        })
        .collect::<Result<Vec<_>, AssembleError>>()?;

    let submission = OrderSubmission {
        customer_name: draft.customer_name.trim().to_string(),
        customer_phone: draft.phone_number.clone(),
        order_type: draft.order_type,
        delivery_address: draft.delivery_address.trim().to_string(),
        delivery_latitude: draft.delivery_latitude,
        delivery_longitude: draft.delivery_longitude,
        payment_method: draft.payment_method,
        notes: draft.notes(),
        line_items,
    };

    Ok(AssembledOrder {
        submission,
        totals: Totals::for_checkout(items, draft.order_type, settings),
    })
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        prices::Price,
        products::{AddOn, Size},
        quantity::Quantity,
    };

    use super::*;

    fn line(size_ref: Option<u64>, quantity: i64) -> LineItem {
        LineItem {
            id: LineItemId::generate(),
            product_id: "12".to_string(),
            size_ref,
            name: "Large Fries".to_string(),
            size: Size::Large,
            quantity: Quantity::clamped(quantity),
            unit_price: Price::from_rand(45),
            addons: smallvec![],
            image_url: None,
        }
    }

    fn draft() -> CheckoutDraft {
        CheckoutDraft {
            customer_name: "  Thandi Mokoena ".to_string(),
            phone_number: "082 123 4567".to_string(),
            delivery_address: "12 Main Road, Mdantsane".to_string(),
            ..CheckoutDraft::default()
        }
    }

    #[test]
    fn delivery_order_is_priced_with_fee() -> TestResult {
        let order = assemble(&[line(Some(12), 2)], &draft(), &DeliverySettings::default())?;

        assert_eq!(order.totals.subtotal, Price::from_rand(90));
        assert_eq!(order.totals.delivery_fee, Price::from_rand(30));
        assert_eq!(order.totals.total, Price::from_rand(120));

        Ok(())
    }

    #[test]
    fn collection_order_has_no_fee() -> TestResult {
        let draft = CheckoutDraft {
            order_type: OrderType::Collection,
            ..draft()
        };

        let order = assemble(&[line(Some(12), 2)], &draft, &DeliverySettings::default())?;

        assert_eq!(order.totals.delivery_fee, Price::ZERO);
        assert_eq!(order.totals.total, order.totals.subtotal);
        assert_eq!(order.submission.order_type, OrderType::Collection);

        Ok(())
    }

    #[test]
    fn lines_map_to_size_refs_and_addon_ids() -> TestResult {
        let mut item = line(Some(7), 3);
        item.addons = smallvec![
            AddOn {
                id: 4,
                name: "Cheese".to_string(),
                price: Price::from_rand(10),
            },
            AddOn {
                id: 2,
                name: "Bacon".to_string(),
                price: Price::from_rand(15),
            },
        ];

        let order = assemble(&[item, line(Some(9), 1)], &draft(), &DeliverySettings::default())?;
        let [first, second] = order.submission.line_items.as_slice() else {
            unreachable!("expected two submission lines");
        };

        assert_eq!(first.size_ref, 7);
        assert_eq!(first.quantity, 3);
        assert_eq!(first.addon_ids.as_slice(), &[4, 2]);
        assert!(second.addon_ids.is_empty());

        Ok(())
    }

    #[test]
    fn submission_trims_text_and_keeps_phone_as_entered() -> TestResult {
        let draft = CheckoutDraft {
            special_instructions: Some("  ring the bell  ".to_string()),
            ..draft()
        };

        let order = assemble(&[line(Some(12), 1)], &draft, &DeliverySettings::default())?;

        assert_eq!(order.submission.customer_name, "Thandi Mokoena");
        assert_eq!(order.submission.customer_phone, "082 123 4567");
        assert_eq!(order.submission.notes.as_deref(), Some("ring the bell"));

        Ok(())
    }

    #[test]
    fn blank_instructions_are_omitted() -> TestResult {
        let draft = CheckoutDraft {
            special_instructions: Some("   ".to_string()),
            ..draft()
        };

        let order = assemble(&[line(Some(12), 1)], &draft, &DeliverySettings::default())?;

        assert_eq!(order.submission.notes, None);

        Ok(())
    }

    #[test]
    fn missing_size_ref_is_reported_by_line() {
        let item = line(None, 1);
        let id = item.id.clone();

        let result = assemble(&[item], &draft(), &DeliverySettings::default());

        assert_eq!(result, Err(AssembleError::MissingSizeRef(id)));
    }

    #[test]
    fn invalid_draft_is_rejected_before_lines_are_checked() {
        let draft = CheckoutDraft {
            phone_number: "123".to_string(),
            ..draft()
        };

        let result = assemble(&[line(None, 1)], &draft, &DeliverySettings::default());

        assert!(matches!(result, Err(AssembleError::Validation(errors)) if errors.len() == 1));
    }

    #[test]
    fn draft_prefills_from_user() {
        let user = User {
            id: 1,
            name: "Thandi".to_string(),
            email: "thandi@example.com".to_string(),
            phone: Some("0821234567".to_string()),
            default_address: Some("12 Main Road, Mdantsane".to_string()),
            default_address_latitude: Some(-33.01),
            default_address_longitude: Some(27.86),
        };

        let draft = CheckoutDraft::for_user(Some(&user));

        assert_eq!(draft.customer_name, "Thandi");
        assert_eq!(draft.phone_number, "0821234567");
        assert_eq!(draft.coordinates(), Some(Coordinates::new(-33.01, 27.86)));
        assert_eq!(CheckoutDraft::for_user(None), CheckoutDraft::default());
    }

    #[test]
    fn set_address_replaces_coordinates() {
        let mut draft = draft();
        draft.set_address("1 Long Street", Some(Coordinates::new(-33.0, 27.9)));
        draft.set_address("2 Long Street", None);

        assert_eq!(draft.delivery_address, "2 Long Street");
        assert_eq!(draft.coordinates(), None);
    }
}
