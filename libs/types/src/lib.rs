//! Types library for the limit order matching engine
//!
//! Core type definitions shared by the engine and by whatever layer feeds it
//! orders or consumes its trades. All numerics are fixed-point decimals.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, TradeId)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Incoming requests, resting orders, sides and statuses
//! - `trade`: Trade execution records
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::errors::*;
}
