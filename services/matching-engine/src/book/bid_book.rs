//! Bid (buy-side) order book
//!
//! Maintains buy orders sorted by price descending (best bid first).
//! Uses BTreeMap so iteration order is deterministic.

use std::collections::BTreeMap;
use types::numeric::{Price, Quantity};

use super::price_level::{OrderHandle, PriceLevel};

/// Bid (buy) side order book
///
/// Orders are sorted by price descending, so the highest bid is first.
/// At each price level, orders are maintained in FIFO order.
#[derive(Debug, Clone)]
pub struct BidBook {
    /// Price levels keyed ascending; the best bid is the last key
    levels: BTreeMap<Price, PriceLevel>,
    /// Number of resting orders across all levels
    order_count: usize,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    /// Append an order handle to the level at `price`
    ///
    /// Returns None if the level total would overflow; the book is unchanged.
    pub fn insert(&mut self, price: Price, handle: OrderHandle, quantity: Quantity) -> Option<()> {
        if !self.can_accept(price, quantity) {
            return None;
        }
        self.levels.entry(price).or_default().insert(handle, quantity)?;
        self.order_count += 1;
        Some(())
    }

    /// Whether an order of `quantity` could rest at `price` without overflow
    pub fn can_accept(&self, price: Price, quantity: Quantity) -> bool {
        self.levels
            .get(&price)
            .map_or(true, |level| level.can_accept(quantity))
    }

    /// Get the best bid (highest price) with its level total
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        // BTreeMap iter is ascending, so we need last()
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Price and handle of the order that matches next
    pub(crate) fn best_front(&self) -> Option<(Price, OrderHandle)> {
        let (price, level) = self.levels.iter().next_back()?;
        level.peek_front().map(|handle| (*price, handle))
    }

    /// Account for a partial fill of the order at the front of the best level
    pub(crate) fn reduce_best(&mut self, filled: Quantity) {
        if let Some((_, level)) = self.levels.iter_mut().next_back() {
            level.reduce_front(filled);
        }
    }

    /// Remove the fully filled order at the front of the best level
    ///
    /// Drops the level once it is empty.
    pub(crate) fn pop_best(&mut self, filled: Quantity) -> Option<OrderHandle> {
        let mut entry = self.levels.last_entry()?;
        let handle = entry.get_mut().pop_front(filled)?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.order_count -= 1;
        Some(handle)
    }

    /// Iterate levels from best (highest) to worst
    pub fn levels(&self) -> impl Iterator<Item = (Price, &PriceLevel)> + '_ {
        self.levels.iter().rev().map(|(price, level)| (*price, level))
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev() // Reverse to get highest prices first
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Get the number of resting orders
    pub fn order_count(&self) -> usize {
        self.order_count
    }
}

impl Default for BidBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(s: &str) -> Quantity {
        Quantity::from_str(s).unwrap()
    }

    #[test]
    fn test_bid_book_insert() {
        let mut book = BidBook::new();

        book.insert(Price::from_u64(50000), 0, qty("1.5")).unwrap();

        assert_eq!(book.level_count(), 1);
        assert_eq!(book.order_count(), 1);
        assert!(!book.is_empty());
    }

    #[test]
    fn test_bid_book_best_bid() {
        let mut book = BidBook::new();

        book.insert(Price::from_u64(50000), 0, qty("1.0")).unwrap();
        book.insert(Price::from_u64(51000), 1, qty("2.0")).unwrap(); // Higher price
        book.insert(Price::from_u64(49000), 2, qty("1.5")).unwrap(); // Lower price

        let (best_price, best_qty) = book.best_bid().unwrap();
        assert_eq!(best_price, Price::from_u64(51000)); // Highest price
        assert_eq!(best_qty, qty("2.0"));
        assert_eq!(book.best_front(), Some((Price::from_u64(51000), 1)));
    }

    #[test]
    fn test_bid_book_pop_best_drops_empty_level() {
        let mut book = BidBook::new();
        book.insert(Price::from_u64(50000), 0, qty("1.0")).unwrap();
        book.insert(Price::from_u64(49000), 1, qty("1.0")).unwrap();

        assert_eq!(book.pop_best(qty("1.0")), Some(0));
        assert_eq!(book.level_count(), 1);
        assert_eq!(book.order_count(), 1);
        assert_eq!(book.best_bid_price(), Some(Price::from_u64(49000)));
    }

    #[test]
    fn test_bid_book_depth_snapshot() {
        let mut book = BidBook::new();

        book.insert(Price::from_u64(50000), 0, qty("1.0")).unwrap();
        book.insert(Price::from_u64(51000), 1, qty("2.0")).unwrap();
        book.insert(Price::from_u64(49000), 2, qty("1.5")).unwrap();
        book.insert(Price::from_u64(52000), 3, qty("0.5")).unwrap();

        let depth = book.depth_snapshot(2);

        // Should return top 2 levels (highest prices first)
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].0, Price::from_u64(52000));
        assert_eq!(depth[1].0, Price::from_u64(51000));
    }

    #[test]
    fn test_bid_book_price_time_priority() {
        let mut book = BidBook::new();

        book.insert(Price::from_u64(50000), 0, qty("1.0")).unwrap();
        book.insert(Price::from_u64(50000), 1, qty("2.0")).unwrap(); // Same price

        // Both orders at same price level, oldest first
        assert_eq!(book.level_count(), 1);
        assert_eq!(book.best_front(), Some((Price::from_u64(50000), 0)));

        let (price, total_qty) = book.best_bid().unwrap();
        assert_eq!(price, Price::from_u64(50000));
        assert_eq!(total_qty, qty("3.0")); // 1.0 + 2.0

        book.reduce_best(qty("0.5"));
        assert_eq!(book.best_bid().unwrap().1, qty("2.5"));
    }
}
