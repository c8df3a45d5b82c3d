//! Quantities

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest quantity a cart line may hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a cart line may hold.
pub const MAX_QUANTITY: u32 = 10;

/// A line item quantity, always within `MIN_QUANTITY..=MAX_QUANTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The minimum quantity.
    pub const MIN: Self = Self(MIN_QUANTITY);

    /// The maximum quantity.
    pub const MAX: Self = Self(MAX_QUANTITY);

    /// Creates a quantity, clamping anything above the maximum.
    ///
    /// Returns `None` when the requested value is below the minimum; callers treat
    /// that as "remove the line" rather than storing a zero quantity.
    #[must_use]
    pub fn new(value: i64) -> Option<Self> {
        if value < i64::from(MIN_QUANTITY) {
            return None;
        }

        let clamped = u32::try_from(value).map_or(MAX_QUANTITY, |v| v.min(MAX_QUANTITY));

        Some(Self(clamped))
    }

    /// Creates a quantity, clamping into the valid range on both ends.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Self::new(value).unwrap_or(Self::MIN)
    }

    /// Adds `extra` units, saturating at the maximum.
    #[must_use]
    pub fn saturating_add(self, extra: Self) -> Self {
        Self(self.0.saturating_add(extra.0).min(MAX_QUANTITY))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("quantity {value} is below {MIN_QUANTITY}"))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
