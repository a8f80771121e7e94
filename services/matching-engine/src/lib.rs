//! Matching Engine Service
//!
//! Two-sided limit order matching engine implementing price-time priority.
//! An incoming order trades against the opposite side while prices cross,
//! always at the resting order's price; any remainder rests in the book.
//!
//! **Key Invariants:**
//! - Bids ordered by price descending, asks ascending, oldest first within a price
//! - No resting order with zero quantity
//! - The book is never left crossed
//! - Conservation of quantity: submitted = traded + residual
//!
//! The engine is a synchronous, single-owner state machine: `submit` takes
//! `&mut self`, so concurrent producers must serialize access themselves.

pub mod book;
pub mod matching;
pub mod engine;
pub mod events;
pub mod config;

pub use book::{InvariantViolation, MatchPlan, OrderBook};
pub use config::EngineConfig;
pub use engine::{MatchingEngine, SubmitResult};
pub use events::EngineEvent;
