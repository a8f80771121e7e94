//! Price level implementation with FIFO queue
//!
//! A price level holds every resting order at one price. Orders are kept in
//! FIFO (first-in-first-out) order so the oldest order at a price matches
//! first. The level stores arena handles only; the orders themselves live in
//! the book's arena.

use std::collections::VecDeque;
use types::numeric::Quantity;

/// Key of an order in the book's arena
pub type OrderHandle = usize;

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering for time-priority matching and a cached
/// total of the remaining quantity across the queue.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Queue of arena handles at this price level (FIFO order)
    orders: VecDeque<OrderHandle>,
    /// Total remaining quantity at this level
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append an order at the back of the queue (time priority)
    ///
    /// Returns None, leaving the level untouched, if the level total would
    /// overflow.
    pub fn insert(&mut self, handle: OrderHandle, quantity: Quantity) -> Option<()> {
        let total = self.total_quantity.checked_add(quantity)?;
        self.orders.push_back(handle);
        self.total_quantity = total;
        Some(())
    }

    /// Whether `quantity` could be added without overflowing the level total
    pub fn can_accept(&self, quantity: Quantity) -> bool {
        self.total_quantity.checked_add(quantity).is_some()
    }

    /// Peek at the front (oldest) order without removing it
    pub fn peek_front(&self) -> Option<OrderHandle> {
        self.orders.front().copied()
    }

    /// Reduce the level total after the front order was partially filled
    pub fn reduce_front(&mut self, filled: Quantity) {
        self.total_quantity = self.total_quantity.checked_sub(filled).unwrap_or(Quantity::zero());
    }

    /// Remove the front order after it was fully filled
    ///
    /// `filled` is the quantity consumed by the final fill.
    pub fn pop_front(&mut self, filled: Quantity) -> Option<OrderHandle> {
        let handle = self.orders.pop_front()?;
        self.reduce_front(filled);
        Some(handle)
    }

    /// Iterate handles in time priority
    pub fn handles(&self) -> impl Iterator<Item = OrderHandle> + '_ {
        self.orders.iter().copied()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}
