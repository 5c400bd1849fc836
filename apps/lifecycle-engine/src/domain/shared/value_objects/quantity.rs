//! Quantity value object for order sizes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use crate::domain::shared::DomainError;

/// A share quantity.
///
/// Represented as a Decimal; orders validate to whole positive units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Zero quantity.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new Quantity from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Quantity from an integer.
    #[must_use]
    pub fn from_i64(amount: i64) -> Self {
        Self(Decimal::new(amount, 0))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this quantity is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Validate quantity for order submission.
    ///
    /// # Errors
    ///
    /// Returns error if the quantity is not a positive whole number.
    pub fn validate_for_order(&self) -> Result<(), DomainError> {
        if self.0 <= Decimal::ZERO {
            return Err(DomainError::invalid(
                "quantity",
                "order quantity must be positive",
            ));
        }
        if self.0 != self.0.trunc() {
            return Err(DomainError::invalid(
                "quantity",
                "order quantity must be a whole number of shares",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantity_validate_positive_whole() {
        assert!(Quantity::from_i64(10).validate_for_order().is_ok());
    }

    #[test]
    fn quantity_validate_rejects_zero_and_negative() {
        assert!(Quantity::ZERO.validate_for_order().is_err());
        assert!(Quantity::from_i64(-5).validate_for_order().is_err());
    }

    #[test]
    fn quantity_validate_rejects_fractional() {
        assert!(Quantity::new(dec!(1.5)).validate_for_order().is_err());
    }

    #[test]
    fn quantity_ordering() {
        assert!(Quantity::from_i64(5) < Quantity::from_i64(10));
    }
}
