//! Ask (sell-side) order book
//!
//! Maintains sell orders sorted by price ascending (best ask first).
//! Uses BTreeMap so iteration order is deterministic.

use std::collections::BTreeMap;
use types::numeric::{Price, Quantity};

use super::price_level::{OrderHandle, PriceLevel};

/// Ask (sell) side order book
///
/// Orders are sorted by price ascending, so the lowest ask is first.
/// At each price level, orders are maintained in FIFO order.
#[derive(Debug, Clone)]
pub struct AskBook {
    /// Price levels sorted ascending (lowest price first)
    levels: BTreeMap<Price, PriceLevel>,
    /// Number of resting orders across all levels
    order_count: usize,
}

impl AskBook {
    /// Create a new empty ask book
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

    /// Get the best ask (lowest price) with its level total
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        // BTreeMap iter is ascending, so first() gives us lowest price
        self.levels
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best ask price
    pub fn best_ask_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Price and handle of the order that matches next
    pub(crate) fn best_front(&self) -> Option<(Price, OrderHandle)> {
        let (price, level) = self.levels.iter().next()?;
        level.peek_front().map(|handle| (*price, handle))
    }

    /// Account for a partial fill of the order at the front of the best level
    pub(crate) fn reduce_best(&mut self, filled: Quantity) {
        if let Some((_, level)) = self.levels.iter_mut().next() {
            level.reduce_front(filled);
        }
    }

    /// Remove the fully filled order at the front of the best level
    ///
    /// Drops the level once it is empty.
    pub(crate) fn pop_best(&mut self, filled: Quantity) -> Option<OrderHandle> {
        let mut entry = self.levels.first_entry()?;
        let handle = entry.get_mut().pop_front(filled)?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.order_count -= 1;
        Some(handle)
    }

    /// Iterate levels from best (lowest) to worst
    pub fn levels(&self) -> impl Iterator<Item = (Price, &PriceLevel)> + '_ {
        self.levels.iter().map(|(price, level)| (*price, level))
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the ask book is empty
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

impl Default for AskBook {
    fn default() -> Self {
        Self::new()
    }
}
