//! Prices

use std::{
    fmt,
    iter::Sum,
    ops::{Add, Deref},
};

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quantity::Quantity;

/// Currency every price in the store is quoted in.
pub const CURRENCY: &Currency = iso::ZAR;

/// Errors raised when constructing a price.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// Prices may not be negative.
    #[error("price {0} is negative")]
    Negative(Decimal),
}

/// A non-negative amount in rand.
///
/// Amounts keep whatever precision they were created with. Rounding only happens
/// when formatting for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price {
    value: Decimal,
}

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self {
        value: Decimal::ZERO,
    };

    /// Creates a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceError::Negative(value));
        }

        Ok(Self { value })
    }

    /// Creates a price from whole cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self {
            value: Decimal::new(i64::from(cents), 2),
        }
    }

    /// Creates a price from whole rand.
    #[must_use]
    pub fn from_rand(rand: u32) -> Self {
        Self {
            value: Decimal::from(rand),
        }
    }

    /// Multiplies the price by a line quantity.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self {
            value: self.value * Decimal::from(quantity.get()),
        }
    }

    /// Converts the price into a currency-aware money value.
    #[must_use]
    pub fn to_money(self) -> Money<'static, Currency> {
        Money::from_decimal(self.value, CURRENCY)
    }

    /// Checks whether the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl Deref for Price {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.value
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Self) -> Self::Output {
        Price {
            value: self.value + rhs.value,
        }
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_price(*self))
    }
}

/// Formats a price for display, e.g. `R45.00`.
pub fn format_price(price: Price) -> String {
    format!("R{:.2}", price.value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_rejects_negative_values() {
        let result = Price::new(Decimal::new(-1, 2));

        assert_eq!(result, Err(PriceError::Negative(Decimal::new(-1, 2))));
    }

    #[test]
    fn new_accepts_zero() -> TestResult {
        let price = Price::new(Decimal::ZERO)?;

        assert!(price.is_zero());

        Ok(())
    }

    #[test]
    fn times_multiplies_by_quantity() {
        let price = Price::from_cents(12_50);

        assert_eq!(price.times(Quantity::clamped(3)), Price::from_cents(37_50));
    }

    #[test]
    fn prices_sum() {
        let total: Price = [Price::from_rand(45), Price::from_cents(5_50)]
            .into_iter()
            .sum();

        assert_eq!(total, Price::from_cents(50_50));
    }

    #[test]
    fn format_uses_two_decimals() {
        assert_eq!(format_price(Price::from_rand(45)), "R45.00");
        assert_eq!(Price::from_cents(1_05).to_string(), "R1.05");
    }

    #[test]
    fn to_money_uses_rand() {
        let money = Price::from_cents(90_00).to_money();

        assert_eq!(money.currency(), CURRENCY);
        assert_eq!(money.to_minor_units(), 9000);
    }

    #[test]
    fn deserialises_from_number_and_string() -> TestResult {
        let from_number: Price = serde_json::from_str("45.5")?;
        let from_string: Price = serde_json::from_str("\"45.50\"")?;

        assert_eq!(from_number, from_string);

        Ok(())
    }

    #[test]
    fn deserialising_negative_is_rejected() {
        let result: Result<Price, _> = serde_json::from_str("-2");

        assert!(result.is_err());
    }
}
