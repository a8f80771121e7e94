//! Engine configuration

use serde::{Deserialize, Serialize};

/// Matching engine configuration
///
/// Every field has a default, so a host can deserialize a partial document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// First sequence handed to a resting order
    pub starting_order_sequence: u64,
    /// First sequence stamped on a trade
    pub starting_trade_sequence: u64,
    /// Maximum decimal places accepted on a price
    pub price_scale: u32,
    /// Maximum decimal places accepted on a quantity
    pub quantity_scale: u32,
    /// Verify book invariants after every submission
    pub check_invariants: bool,
    /// Arena capacity reserved up front
    pub initial_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_order_sequence: 1,
            starting_trade_sequence: 1,
            price_scale: 8,
            quantity_scale: 8,
            check_invariants: cfg!(debug_assertions),
            initial_capacity: 1024,
        }
    }
}
