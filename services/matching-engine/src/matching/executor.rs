//! Trade execution logic
//!
//! Turns fills into `Trade` records stamped with a monotonic sequence.

use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Match executor for handling trade generation
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Sequence the next trade will carry
    pub fn next_sequence_value(&self) -> u64 {
        self.sequence_counter
    }

    /// Whether `count` more trades can be sequenced without overflow
    pub fn can_issue(&self, count: usize) -> bool {
        u64::try_from(count)
            .ok()
            .and_then(|count| self.sequence_counter.checked_add(count))
            .is_some()
    }

    /// Get next sequence number (monotonically increasing)
    ///
    /// Callers reserve room with `can_issue` first.
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter = self.sequence_counter.saturating_add(1);
        seq
    }

    /// Execute a trade between maker and taker orders
    ///
    /// `price` is the maker's price; `side` is the taker's side.
    pub fn execute_trade(
        &mut self,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Trade {
        debug_assert!(!quantity.is_zero(), "trades carry a positive quantity");

        let sequence = self.next_sequence();

        Trade::new(
            sequence,
            maker_order_id,
            taker_order_id,
            side,
            price,
            quantity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_trade() {
        let mut executor = MatchExecutor::new(1000);
        let maker = OrderId::new();

        let trade = executor.execute_trade(
            maker,
            OrderId::new(),
            Side::BUY,
            Price::from_u64(50000),
            Quantity::from_str("0.5").unwrap(),
        );

        assert_eq!(trade.sequence, 1000);
        assert_eq!(trade.maker_order_id, maker);
        assert_eq!(trade.price, Price::from_u64(50000));
        assert_eq!(trade.quantity, Quantity::from_str("0.5").unwrap());
    }

    #[test]
    fn test_sequence_monotonic() {
        let mut executor = MatchExecutor::new(1000);

        let trade1 = executor.execute_trade(
            OrderId::new(),
            OrderId::new(),
            Side::BUY,
            Price::from_u64(50000),
            Quantity::from_str("0.5").unwrap(),
        );

        let trade2 = executor.execute_trade(
            OrderId::new(),
            OrderId::new(),
            Side::SELL,
            Price::from_u64(50000),
            Quantity::from_str("0.3").unwrap(),
        );

        assert_eq!(trade1.sequence, 1000);
        assert_eq!(trade2.sequence, 1001);
        assert_eq!(executor.next_sequence_value(), 1002);
    }

    #[test]
    fn test_can_issue_near_limit() {
        let executor = MatchExecutor::new(u64::MAX - 2);
        assert!(executor.can_issue(2));
        assert!(!executor.can_issue(3));
    }
}
