//! Trade execution types

use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One match between a resting (maker) order and an incoming (taker) order
///
/// The price is always the maker's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub sequence: u64,  // Engine-wide monotonic sequence

    // Order references
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,

    // Trade details (from taker perspective)
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl Trade {
    pub fn new(
        sequence: u64,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            maker_order_id,
            taker_order_id,
            side,
            price,
            quantity,
        }
    }

    /// Calculate trade value (price × quantity)
    ///
    /// Returns None if the product does not fit in a decimal.
    pub fn trade_value(&self) -> Option<Decimal> {
        self.quantity.as_decimal().checked_mul(self.price.as_decimal())
    }
}
