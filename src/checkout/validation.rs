//! Checkout form validation

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;

use crate::checkout::{CheckoutDraft, OrderType};

/// Shortest accepted customer name, after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Shortest accepted address, after trimming.
pub const MIN_ADDRESS_LEN: usize = 10;

#[expect(clippy::expect_used, reason = "pattern is a compile-time literal")]
static SA_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    // 0XXXXXXXXX, +27XXXXXXXXX or 27XXXXXXXXX; the first subscriber digit is never 0.
    Regex::new(r"^(?:0|\+?27)[1-9][0-9]{8}$").expect("valid phone pattern")
});

/// A checkout form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Customer's full name
    CustomerName,

    /// Customer's phone number
    PhoneNumber,

    /// Delivery or contact address
    DeliveryAddress,
}

/// Validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl FieldErrors {
    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Clear the error for a field, as happens when the customer edits it.
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    /// Iterate over failing fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.errors.insert(field, message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().copied().collect();

        f.write_str(&messages.join("; "))
    }
}

/// Checks a South African phone number. Whitespace and dashes are ignored.
pub fn is_valid_sa_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    SA_PHONE.is_match(&cleaned)
}

/// Validate every field of the draft, collecting all failures.
///
/// # Errors
///
/// Returns the [`FieldErrors`] for every field that failed.
pub fn validate(draft: &CheckoutDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if draft.customer_name.trim().chars().count() < MIN_NAME_LEN {
        errors.insert(Field::CustomerName, "Please enter your full name");
    }

    if draft.phone_number.trim().is_empty() {
        errors.insert(Field::PhoneNumber, "Please enter your phone number");
    } else if !is_valid_sa_phone(&draft.phone_number) {
        errors.insert(Field::PhoneNumber, "Please enter a valid SA phone number");
    }

    if draft.delivery_address.trim().chars().count() < MIN_ADDRESS_LEN {
        let message = match draft.order_type {
            OrderType::Delivery => "Please enter a valid delivery address",
            OrderType::Collection => "Please enter your address for contact purposes",
        };

        errors.insert(Field::DeliveryAddress, message);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
