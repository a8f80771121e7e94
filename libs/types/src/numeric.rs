//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Arithmetic is exposed only through checked operations so that an overflow
//! surfaces as `None` instead of a panic or a wrapped value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised while constructing numeric values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
    #[error("not a decimal number: {0}")]
    Parse(String),

    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(Decimal),
}

/// Limit price, strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal
    ///
    /// # Panics
    /// Panics if the value is zero or negative
    pub fn new(value: Decimal) -> Self {
        assert!(value > Decimal::ZERO, "Price must be positive");
        Self(value)
    }

    /// Create a price, returning None unless the value is positive
    pub fn try_new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    /// Create a whole-number price
    ///
    /// # Panics
    /// Panics if `value` is zero
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Parse a price from its decimal string form
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, NumericError> {
        let value = Decimal::from_str(s).map_err(|_| NumericError::Parse(s.to_string()))?;
        Self::try_from(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Number of significant decimal places (trailing zeros ignored)
    pub fn scale(&self) -> u32 {
        self.0.normalize().scale()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = NumericError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or(NumericError::NonPositivePrice(value))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order or trade quantity, never negative
///
/// Zero is representable so that a fully-filled residual can be reported,
/// but the book never holds a zero quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity from a decimal
    ///
    /// # Panics
    /// Panics if the value is negative
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "Quantity must not be negative");
        Self(value)
    }

    /// Create a quantity, returning None if the value is negative
    pub fn try_new(value: Decimal) -> Option<Self> {
        (value >= Decimal::ZERO).then_some(Self(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse a quantity from its decimal string form
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, NumericError> {
        let value = Decimal::from_str(s).map_err(|_| NumericError::Parse(s.to_string()))?;
        Self::try_from(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of significant decimal places (trailing zeros ignored)
    pub fn scale(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Add two quantities, returning None unless the sum is exact
    ///
    /// `Decimal` drops fractional digits instead of failing once the
    /// mantissa is full, so a sum that lost digits counts as overflow.
    pub fn checked_add(self, other: Quantity) -> Option<Quantity> {
        if other.is_zero() {
            return Some(self);
        }
        if self.is_zero() {
            return Some(other);
        }
        let sum = self.0.checked_add(other.0)?;
        exact(sum, self.0, other.0).then_some(Self(sum))
    }

    /// Subtract, returning None if the result would go negative or lose digits
    pub fn checked_sub(self, other: Quantity) -> Option<Quantity> {
        if other.is_zero() {
            return Some(self);
        }
        let diff = self.0.checked_sub(other.0)?;
        if diff.is_sign_negative() && !diff.is_zero() {
            return None;
        }
        if diff.is_zero() {
            return Some(Self::zero());
        }
        exact(diff, self.0, other.0).then_some(Self(diff))
    }
}

/// Whether `result` of adding or subtracting `a` and `b` kept every digit
///
/// Both operands are aligned to the larger scale; a result at a smaller
/// scale was rounded.
fn exact(result: Decimal, a: Decimal, b: Decimal) -> bool {
    result.scale() >= a.scale().max(b.scale())
}

impl TryFrom<Decimal> for Quantity {
    type Error = NumericError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or(NumericError::NegativeQuantity(value))
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
