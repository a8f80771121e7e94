//! Order book infrastructure module
//!
//! Contains price levels, bid book, and ask book implementations, and the
//! `OrderBook` that ties both sides to a single arena of resting orders.
//! Price levels only hold arena handles, so every resting order has exactly
//! one owner and removal never leaves a dangling reference.

pub mod price_level;
pub mod bid_book;
pub mod ask_book;

pub use price_level::{OrderHandle, PriceLevel};
pub use bid_book::BidBook;
pub use ask_book::AskBook;

use std::collections::HashMap;

use slab::Slab;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use crate::matching::crossing;

/// Broken book invariant, reported by [`OrderBook::check_invariants`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{side:?} levels out of price order: {previous} then {next}")]
    LevelsOutOfOrder { side: Side, previous: Price, next: Price },

    #[error("order {order_id} at {price} breaks time priority")]
    SequenceOutOfOrder { price: Price, order_id: OrderId },

    #[error("order {order_id} rests with non-positive quantity")]
    EmptyOrder { order_id: OrderId },

    #[error("order {order_id} is filed under the wrong side or price")]
    Misfiled { order_id: OrderId },

    #[error("order {order_id} filled + remaining != quantity")]
    QuantityMismatch { order_id: OrderId },

    #[error("level total at {price} is {cached}, orders sum to {actual}")]
    LevelTotalMismatch { price: Price, cached: Quantity, actual: Quantity },

    #[error("empty price level kept at {price}")]
    EmptyLevel { price: Price },

    #[error("handle {handle} does not point at a live order")]
    DanglingHandle { handle: OrderHandle },

    #[error("book crossed: best bid {best_bid} >= best ask {best_ask}")]
    Crossed { best_bid: Price, best_ask: Price },

    #[error("arena holds {arena} orders but sides reference {referenced}")]
    CountMismatch { arena: usize, referenced: usize },
}

/// Result of matching against the front order of one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub maker_order_id: OrderId,
    /// Price of the resting order, which is the execution price
    pub price: Price,
    pub quantity: Quantity,
    /// The resting order was fully consumed and removed
    pub maker_filled: bool,
}

/// Outcome of matching an incoming order, worked out without mutating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPlan {
    /// Trades the order would produce
    pub trades: usize,
    /// Quantity left to rest once matching stops
    pub residual: Quantity,
}

/// Both sides of the book plus the arena owning every resting order
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BidBook,
    asks: AskBook,
    orders: Slab<Order>,
    index: HashMap<OrderId, OrderHandle>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book with arena space for `capacity` resting orders
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn bids(&self) -> &BidBook {
        &self.bids
    }

    pub fn asks(&self) -> &AskBook {
        &self.asks
    }

    /// Highest resting buy price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_bid_price()
    }

    /// Lowest resting sell price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_ask_price()
    }

    /// Number of resting buy orders
    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    /// Number of resting sell orders
    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    /// Number of resting orders on `side`
    pub fn order_count(&self, side: Side) -> usize {
        match side {
            Side::BUY => self.bid_count(),
            Side::SELL => self.ask_count(),
        }
    }

    /// Best price on `side`
    pub fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::BUY => self.best_bid(),
            Side::SELL => self.best_ask(),
        }
    }

    /// Top `depth` levels of `side`, best first, with level totals
    pub fn depth_snapshot(&self, side: Side, depth: usize) -> Vec<(Price, Quantity)> {
        match side {
            Side::BUY => self.bids.depth_snapshot(depth),
            Side::SELL => self.asks.depth_snapshot(depth),
        }
    }

    /// Look up a resting order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.index.get(order_id).and_then(|handle| self.orders.get(*handle))
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.index.contains_key(order_id)
    }

    /// Total number of resting orders on both sides
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders of `side` in match priority (best price, then oldest)
    pub fn resting_orders(&self, side: Side) -> Vec<&Order> {
        let handles: Vec<OrderHandle> = match side {
            Side::BUY => self.bids.levels().flat_map(|(_, level)| level.handles()).collect(),
            Side::SELL => self.asks.levels().flat_map(|(_, level)| level.handles()).collect(),
        };
        handles.into_iter().filter_map(|handle| self.orders.get(handle)).collect()
    }

    /// Whether an order could rest at `price` on `side` without overflowing
    pub(crate) fn can_rest(&self, side: Side, price: Price, quantity: Quantity) -> bool {
        match side {
            Side::BUY => self.bids.can_accept(price, quantity),
            Side::SELL => self.asks.can_accept(price, quantity),
        }
    }

    /// Walk the opposite side the way matching would, touching nothing
    ///
    /// Every quantity update a real match would make is checked first.
    /// Returns None if any of them cannot be represented exactly.
    pub(crate) fn plan_match(&self, side: Side, limit: Price, quantity: Quantity) -> Option<MatchPlan> {
        match side.opposite() {
            Side::BUY => self.plan_against(self.bids.levels(), side, limit, quantity),
            Side::SELL => self.plan_against(self.asks.levels(), side, limit, quantity),
        }
    }

    fn plan_against<'a>(
        &self,
        levels: impl Iterator<Item = (Price, &'a PriceLevel)>,
        side: Side,
        limit: Price,
        quantity: Quantity,
    ) -> Option<MatchPlan> {
        let mut remaining = quantity;
        let mut filled = Quantity::zero();
        let mut trades = 0;

        for (price, level) in levels {
            if remaining.is_zero() || !crossing::incoming_can_match(side, limit, price) {
                break;
            }

            let mut level_total = level.total_quantity();
            for handle in level.handles() {
                if remaining.is_zero() {
                    break;
                }
                let maker = self.orders.get(handle)?;
                let fill = remaining.min(maker.remaining_quantity);

                maker.remaining_quantity.checked_sub(fill)?;
                maker.filled_quantity.checked_add(fill)?;
                level_total = level_total.checked_sub(fill)?;
                filled = filled.checked_add(fill)?;
                remaining = remaining.checked_sub(fill)?;
                trades += 1;
            }
        }

        Some(MatchPlan { trades, residual: remaining })
    }

    /// Place an order at the back of its price level
    ///
    /// Returns None, with the book unchanged, if the level total would
    /// overflow.
    pub(crate) fn insert(&mut self, order: Order) -> Option<OrderHandle> {
        let entry = self.orders.vacant_entry();
        let handle = entry.key();
        match order.side {
            Side::BUY => self.bids.insert(order.price, handle, order.remaining_quantity)?,
            Side::SELL => self.asks.insert(order.price, handle, order.remaining_quantity)?,
        }
        self.index.insert(order.order_id, handle);
        entry.insert(order);
        Some(handle)
    }

    /// Fill up to `max_quantity` against the best order of `side`
    ///
    /// The resting order is removed once its remaining quantity reaches
    /// zero. Returns None if `side` is empty.
    pub(crate) fn fill_best(&mut self, side: Side, max_quantity: Quantity) -> Option<Fill> {
        let (price, handle) = match side {
            Side::BUY => self.bids.best_front()?,
            Side::SELL => self.asks.best_front()?,
        };

        let order = self.orders.get_mut(handle)?;
        let quantity = max_quantity.min(order.remaining_quantity);
        order.add_fill(quantity);
        let maker_order_id = order.order_id;
        let maker_filled = order.is_filled();

        if maker_filled {
            match side {
                Side::BUY => self.bids.pop_best(quantity),
                Side::SELL => self.asks.pop_best(quantity),
            };
            self.orders.remove(handle);
            self.index.remove(&maker_order_id);
        } else {
            match side {
                Side::BUY => self.bids.reduce_best(quantity),
                Side::SELL => self.asks.reduce_best(quantity),
            }
        }

        Some(Fill {
            maker_order_id,
            price,
            quantity,
            maker_filled,
        })
    }

    /// Verify ordering, quantity, ownership and no-cross invariants
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let bid_orders = self.check_side(Side::BUY, self.bids.levels())?;
        let ask_orders = self.check_side(Side::SELL, self.asks.levels())?;

        let referenced = bid_orders + ask_orders;
        if referenced != self.orders.len() || self.index.len() != self.orders.len() {
            return Err(InvariantViolation::CountMismatch {
                arena: self.orders.len(),
                referenced,
            });
        }

        if let (Some(best_bid), Some(best_ask)) = (self.best_bid(), self.best_ask()) {
            if best_bid >= best_ask {
                return Err(InvariantViolation::Crossed { best_bid, best_ask });
            }
        }

        Ok(())
    }

    /// Check one side's levels, given best first; returns its order count
    fn check_side<'a>(
        &self,
        side: Side,
        levels: impl Iterator<Item = (Price, &'a PriceLevel)>,
    ) -> Result<usize, InvariantViolation> {
        let mut previous: Option<Price> = None;
        let mut count = 0;

        for (price, level) in levels {
            if let Some(previous) = previous {
                let in_order = match side {
                    Side::BUY => previous > price,
                    Side::SELL => previous < price,
                };
                if !in_order {
                    return Err(InvariantViolation::LevelsOutOfOrder { side, previous, next: price });
                }
            }
            previous = Some(price);

            if level.is_empty() {
                return Err(InvariantViolation::EmptyLevel { price });
            }

            let mut last_sequence: Option<u64> = None;
            let mut actual = Quantity::zero();
            for handle in level.handles() {
                let order = self
                    .orders
                    .get(handle)
                    .ok_or(InvariantViolation::DanglingHandle { handle })?;
                let order_id = order.order_id;

                if order.side != side || order.price != price || self.index.get(&order_id) != Some(&handle) {
                    return Err(InvariantViolation::Misfiled { order_id });
                }
                if order.remaining_quantity.is_zero() {
                    return Err(InvariantViolation::EmptyOrder { order_id });
                }
                if !order.check_invariant() {
                    return Err(InvariantViolation::QuantityMismatch { order_id });
                }
                if last_sequence.is_some_and(|last| last >= order.sequence) {
                    return Err(InvariantViolation::SequenceOutOfOrder { price, order_id });
                }
                last_sequence = Some(order.sequence);

                actual = actual
                    .checked_add(order.remaining_quantity)
                    .ok_or(InvariantViolation::LevelTotalMismatch {
                        price,
                        cached: level.total_quantity(),
                        actual,
                    })?;
                count += 1;
            }

            if actual != level.total_quantity() {
                return Err(InvariantViolation::LevelTotalMismatch {
                    price,
                    cached: level.total_quantity(),
                    actual,
                });
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(side: Side, price: &str, qty: &str, sequence: u64) -> Order {
        Order::new(
            OrderId::new(),
            side,
            Price::from_str(price).unwrap(),
            Quantity::from_str(qty).unwrap(),
            sequence,
        )
    }

    #[test]
    fn test_insert_and_introspect() {
        let mut book = OrderBook::new();
        book.insert(order(Side::BUY, "99.50", "100", 1)).unwrap();
        book.insert(order(Side::SELL, "100.50", "150", 2)).unwrap();
        book.insert(order(Side::SELL, "101", "10", 3)).unwrap();

        assert_eq!(book.bid_count(), 1);
        assert_eq!(book.ask_count(), 2);
        assert_eq!(book.best_bid(), Some(Price::from_str("99.5").unwrap()));
        assert_eq!(book.best_ask(), Some(Price::from_str("100.5").unwrap()));
        assert_eq!(book.len(), 3);
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_fill_best_partial_keeps_order() {
        let mut book = OrderBook::new();
        let resting = order(Side::SELL, "100.50", "150", 1);
        let id = resting.order_id;
        book.insert(resting).unwrap();

        let fill = book.fill_best(Side::SELL, Quantity::from_u64(50)).unwrap();
        assert_eq!(fill.maker_order_id, id);
        assert_eq!(fill.quantity, Quantity::from_u64(50));
        assert!(!fill.maker_filled);

        let remaining = book.get(&id).unwrap();
        assert_eq!(remaining.remaining_quantity, Quantity::from_u64(100));
        assert_eq!(book.depth_snapshot(Side::SELL, 1)[0].1, Quantity::from_u64(100));
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_fill_best_full_removes_order() {
        let mut book = OrderBook::new();
        let first = order(Side::BUY, "99.50", "10", 1);
        let second = order(Side::BUY, "99.50", "5", 2);
        let first_id = first.order_id;
        let second_id = second.order_id;
        book.insert(first).unwrap();
        book.insert(second).unwrap();

        let fill = book.fill_best(Side::BUY, Quantity::from_u64(25)).unwrap();
        assert_eq!(fill.maker_order_id, first_id);
        assert_eq!(fill.quantity, Quantity::from_u64(10));
        assert!(fill.maker_filled);
        assert!(!book.contains(&first_id));

        // Oldest remaining order at the level is next
        let fill = book.fill_best(Side::BUY, Quantity::from_u64(15)).unwrap();
        assert_eq!(fill.maker_order_id, second_id);
        assert!(book.is_empty());
        assert_eq!(book.bids().level_count(), 0);
        assert!(book.fill_best(Side::BUY, Quantity::from_u64(1)).is_none());
    }

    #[test]
    fn test_plan_match_leaves_book_untouched() {
        let mut book = OrderBook::new();
        book.insert(order(Side::SELL, "100", "2", 1)).unwrap();
        book.insert(order(Side::SELL, "101", "3", 2)).unwrap();
        let asks_before = book.depth_snapshot(Side::SELL, 10);

        let sweep = book
            .plan_match(Side::BUY, Price::from_u64(101), Quantity::from_u64(4))
            .unwrap();
        assert_eq!(sweep, MatchPlan { trades: 2, residual: Quantity::zero() });

        let partial = book
            .plan_match(Side::BUY, Price::from_u64(100), Quantity::from_u64(5))
            .unwrap();
        assert_eq!(partial, MatchPlan { trades: 1, residual: Quantity::from_u64(3) });

        assert_eq!(book.depth_snapshot(Side::SELL, 10), asks_before);
    }

    #[test]
    fn test_plan_match_rejects_inexact_maker_remainder() {
        let mut book = OrderBook::new();
        book.insert(order(Side::BUY, "10", "70000000000000000000000000000", 1)).unwrap();

        let plan = book.plan_match(Side::SELL, Price::from_u64(10), Quantity::from_str("0.00000001").unwrap());
        assert_eq!(plan, None);
    }

    #[test]
    fn test_resting_orders_priority() {
        let mut book = OrderBook::new();
        book.insert(order(Side::BUY, "99", "1", 1)).unwrap();
        book.insert(order(Side::BUY, "100", "2", 2)).unwrap();
        book.insert(order(Side::BUY, "99", "3", 3)).unwrap();

        let sequences: Vec<u64> = book
            .resting_orders(Side::BUY)
            .iter()
            .map(|order| order.sequence)
            .collect();
        assert_eq!(sequences, vec![2, 1, 3]);
    }

    #[test]
    fn test_check_invariants_detects_cross() {
        let mut book = OrderBook::new();
        book.insert(order(Side::BUY, "101", "1", 1)).unwrap();
        book.insert(order(Side::SELL, "100", "1", 2)).unwrap();

        assert!(matches!(
            book.check_invariants(),
            Err(InvariantViolation::Crossed { .. })
        ));
    }

    #[test]
    fn test_check_invariants_detects_time_priority_break() {
        let mut book = OrderBook::new();
        book.insert(order(Side::SELL, "100", "1", 5)).unwrap();
        book.insert(order(Side::SELL, "100", "1", 4)).unwrap();

        assert!(matches!(
            book.check_invariants(),
            Err(InvariantViolation::SequenceOutOfOrder { .. })
        ));
    }
}
