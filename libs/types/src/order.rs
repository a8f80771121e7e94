//! Order types
//!
//! `OrderRequest` is what a caller submits; `Order` is what rests in the book.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::OrderError;
use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl FromStr for Side {
    type Err = OrderError;

    /// Accepts "buy"/"sell" in any letter case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Side::BUY)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Side::SELL)
        } else {
            Err(OrderError::InvalidSide(s.to_string()))
        }
    }
}

/// Outcome of a submission from the aggressor's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// No trades; the full quantity rests in the book
    Resting,
    /// Some trades; the remainder rests in the book
    PartiallyFilled,
    /// Fully matched; nothing rests
    Filled,
}

/// Incoming limit order as handed to the engine
///
/// Price and quantity are raw decimals so that invalid values can be
/// represented and rejected by validation rather than by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Caller-assigned id; the engine assigns one when absent
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
}

impl OrderRequest {
    pub fn new(side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            order_id: None,
            side,
            price,
            quantity,
        }
    }

    /// Build a request from its textual fields
    ///
    /// An unrecognized side or an unparseable number is reported as the
    /// matching `OrderError` variant.
    pub fn parse(side: &str, price: &str, quantity: &str) -> Result<Self, OrderError> {
        let side = side.parse::<Side>()?;
        let price = Decimal::from_str(price)
            .map_err(|_| OrderError::InvalidPrice(format!("not a number: {price}")))?;
        let quantity = Decimal::from_str(quantity)
            .map_err(|_| OrderError::InvalidQuantity(format!("not a number: {quantity}")))?;
        Ok(Self::new(side, price, quantity))
    }

    /// Attach a caller-supplied identifier
    pub fn with_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Validate price and quantity
    ///
    /// Both must be strictly positive and carry no more decimal places than
    /// the given scales.
    pub fn validate(&self, price_scale: u32, quantity_scale: u32) -> Result<(Price, Quantity), OrderError> {
        let price = Price::try_new(self.price)
            .ok_or_else(|| OrderError::InvalidPrice(format!("must be positive, got {}", self.price)))?;
        if price.scale() > price_scale {
            return Err(OrderError::ExcessPrecision {
                field: "price",
                scale: price.scale(),
                max: price_scale,
            });
        }

        let quantity = Quantity::try_new(self.quantity)
            .filter(|q| !q.is_zero())
            .ok_or_else(|| OrderError::InvalidQuantity(format!("must be positive, got {}", self.quantity)))?;
        if quantity.scale() > quantity_scale {
            return Err(OrderError::ExcessPrecision {
                field: "quantity",
                scale: quantity.scale(),
                max: quantity_scale,
            });
        }

        Ok((price, quantity))
    }
}

/// An order resting in the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    /// Quantity the order rested with
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    /// Insertion counter used for time priority at equal prices
    pub sequence: u64,
}

impl Order {
    pub fn new(order_id: OrderId, side: Side, price: Price, quantity: Quantity, sequence: u64) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            remaining_quantity: quantity,
            sequence,
        }
    }

    /// Check quantity invariant: filled + remaining = total
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity.checked_add(self.remaining_quantity) == Some(self.quantity)
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Record a fill against this order
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity or the filled
    /// total cannot be represented exactly
    pub fn add_fill(&mut self, fill_quantity: Quantity) {
        let Some(remaining) = self.remaining_quantity.checked_sub(fill_quantity) else {
            panic!("Fill would exceed remaining quantity");
        };

        let Some(filled) = self.filled_quantity.checked_add(fill_quantity) else {
            panic!("Filled quantity would lose precision");
        };

        self.remaining_quantity = remaining;
        self.filled_quantity = filled;

        assert!(self.check_invariant(), "Invariant violated after fill");
    }
}
