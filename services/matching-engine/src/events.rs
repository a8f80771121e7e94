//! Event structures for matching engine
//!
//! Records derived from a submission for whatever layer reports or
//! distributes them. The engine itself never publishes events.

use serde::{Deserialize, Serialize};
use types::ids::{OrderId, TradeId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Order accepted after validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAcceptedEvent {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

/// Trade executed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecutedEvent {
    pub trade_id: TradeId,
    pub sequence: u64,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
}

impl From<&Trade> for TradeExecutedEvent {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.trade_id,
            sequence: trade.sequence,
            maker_order_id: trade.maker_order_id,
            taker_order_id: trade.taker_order_id,
            price: trade.price,
            quantity: trade.quantity,
            side: trade.side,
        }
    }
}

/// Unfilled remainder placed in the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRestedEvent {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub remaining_quantity: Quantity,
    pub sequence: u64,
}

/// Incoming order fully matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFilledEvent {
    pub order_id: OrderId,
    pub filled_quantity: Quantity,
}

/// Any event produced by one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    OrderAccepted(OrderAcceptedEvent),
    TradeExecuted(TradeExecutedEvent),
    OrderRested(OrderRestedEvent),
    OrderFilled(OrderFilledEvent),
}

impl EngineEvent {
    pub fn event_type_label(&self) -> &'static str {
        match self {
            EngineEvent::OrderAccepted(_) => "ORDER_ACCEPTED",
            EngineEvent::TradeExecuted(_) => "TRADE_EXECUTED",
            EngineEvent::OrderRested(_) => "ORDER_RESTED",
            EngineEvent::OrderFilled(_) => "ORDER_FILLED",
        }
    }
}
