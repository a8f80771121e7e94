//! Matching engine core
//!
//! Main coordinator for order book and matching logic. `submit` validates
//! an order, matches it against the opposite side under price-time priority
//! and rests any remainder. Validation and a dry run of the match happen
//! before the book is touched, so a rejected submission leaves no trace.

use tracing::{debug, error, info, warn};
use types::errors::{EngineError, OrderError};
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderRequest, OrderStatus, Side};
use types::trade::Trade;

use crate::book::{InvariantViolation, MatchPlan, OrderBook};
use crate::config::EngineConfig;
use crate::events::{
    EngineEvent, OrderAcceptedEvent, OrderFilledEvent, OrderRestedEvent, TradeExecutedEvent,
};
use crate::matching::{crossing, executor::MatchExecutor};

/// Main matching engine
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    book: OrderBook,
    /// Trade executor with sequence generation
    executor: MatchExecutor,
    /// Sequence handed to the next resting order
    next_order_sequence: u64,
    config: EngineConfig,
}

/// Result of submitting an order
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    /// Quantity as submitted
    pub quantity: Quantity,
    pub status: OrderStatus,
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// Unmatched quantity, now resting in the book (zero when filled)
    pub residual: Quantity,
    /// Time-priority sequence of the resting remainder, if any
    pub resting_sequence: Option<u64>,
}

impl SubmitResult {
    /// Quantity matched by this submission
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity
            .checked_sub(self.residual)
            .unwrap_or(Quantity::zero())
    }

    /// Events describing this submission, in the order they happened
    pub fn events(&self) -> Vec<EngineEvent> {
        let mut events = Vec::with_capacity(self.trades.len() + 2);

        events.push(EngineEvent::OrderAccepted(OrderAcceptedEvent {
            order_id: self.order_id,
            side: self.side,
            price: self.price,
            quantity: self.quantity,
        }));

        events.extend(
            self.trades
                .iter()
                .map(|trade| EngineEvent::TradeExecuted(TradeExecutedEvent::from(trade))),
        );

        match self.resting_sequence {
            Some(sequence) => events.push(EngineEvent::OrderRested(OrderRestedEvent {
                order_id: self.order_id,
                side: self.side,
                price: self.price,
                remaining_quantity: self.residual,
                sequence,
            })),
            None => events.push(EngineEvent::OrderFilled(OrderFilledEvent {
                order_id: self.order_id,
                filled_quantity: self.filled_quantity(),
            })),
        }

        events
    }
}

impl MatchingEngine {
    /// Create a new matching engine with default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        info!(
            starting_order_sequence = config.starting_order_sequence,
            starting_trade_sequence = config.starting_trade_sequence,
            price_scale = config.price_scale,
            quantity_scale = config.quantity_scale,
            check_invariants = config.check_invariants,
            "MatchingEngine initialized"
        );

        Self {
            book: OrderBook::with_capacity(config.initial_capacity),
            executor: MatchExecutor::new(config.starting_trade_sequence),
            next_order_sequence: config.starting_order_sequence,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the book
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Submit an order to the matching engine
    ///
    /// This is the main entry point. The order is matched against the
    /// opposite side while it crosses; each match executes at the resting
    /// order's price. Whatever is left rests on the order's own side.
    pub fn submit(&mut self, request: OrderRequest) -> Result<SubmitResult, EngineError> {
        let (price, quantity) = match request.validate(self.config.price_scale, self.config.quantity_scale) {
            Ok(valid) => valid,
            Err(err) => {
                warn!(
                    side = ?request.side,
                    price = %request.price,
                    quantity = %request.quantity,
                    error = %err,
                    "Order rejected"
                );
                return Err(err.into());
            }
        };

        let order_id = request.order_id.unwrap_or_default();
        if self.book.contains(&order_id) {
            let err = OrderError::DuplicateId(order_id.to_string());
            warn!(%order_id, error = %err, "Order rejected");
            return Err(err.into());
        }

        let side = request.side;
        let plan = self.ensure_capacity(side, price, quantity)?;

        let (trades, residual) = self.match_incoming(order_id, side, price, quantity);
        debug_assert_eq!(residual, plan.residual);

        let resting_sequence = if residual.is_zero() {
            None
        } else {
            Some(self.rest(order_id, side, price, residual)?)
        };

        let status = match (trades.is_empty(), residual.is_zero()) {
            (_, true) => OrderStatus::Filled,
            (true, false) => OrderStatus::Resting,
            (false, false) => OrderStatus::PartiallyFilled,
        };

        debug!(
            %order_id,
            ?side,
            %price,
            %quantity,
            trades = trades.len(),
            %residual,
            bids = self.book.bid_count(),
            asks = self.book.ask_count(),
            "Order processed"
        );

        let result = SubmitResult {
            order_id,
            side,
            price,
            quantity,
            status,
            trades,
            residual,
            resting_sequence,
        };

        if self.config.check_invariants {
            self.assert_consistent(&result);
        }

        Ok(result)
    }

    /// Verify every book invariant against the live book
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.book.check_invariants()
    }

    /// Dry-run the match and reject anything that could overflow mid-submission
    fn ensure_capacity(&self, side: Side, price: Price, quantity: Quantity) -> Result<MatchPlan, EngineError> {
        let plan = self
            .book
            .plan_match(side, price, quantity)
            .ok_or_else(|| self.overflow(format!("fills of {quantity} at {price} would lose precision")))?;

        if !plan.residual.is_zero() {
            let residual = plan.residual;
            if !self.book.can_rest(side, price, residual) {
                return Err(self.overflow(format!("level total at {price} cannot absorb {residual}")));
            }
            if self.next_order_sequence.checked_add(1).is_none() {
                return Err(self.overflow("order sequence exhausted".to_string()));
            }
        }
        if !self.executor.can_issue(plan.trades) {
            return Err(self.overflow("trade sequence exhausted".to_string()));
        }
        Ok(plan)
    }

    fn overflow(&self, context: String) -> EngineError {
        warn!(%context, "Order rejected on overflow");
        EngineError::Overflow { context }
    }

    /// Match against the opposite side while prices cross
    ///
    /// Returns the trades and the quantity left unmatched.
    fn match_incoming(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> (Vec<Trade>, Quantity) {
        let resting_side = side.opposite();
        let mut remaining = quantity;
        let mut trades = Vec::new();

        while !remaining.is_zero() {
            let Some(best_price) = self.book.best_price(resting_side) else {
                break;
            };
            if !crossing::incoming_can_match(side, price, best_price) {
                break;
            }
            let Some(fill) = self.book.fill_best(resting_side, remaining) else {
                break;
            };

            let trade = self.executor.execute_trade(
                fill.maker_order_id,
                order_id,
                side,
                fill.price, // Maker's price
                fill.quantity,
            );
            debug!(
                sequence = trade.sequence,
                maker = %fill.maker_order_id,
                taker = %order_id,
                price = %fill.price,
                quantity = %fill.quantity,
                maker_filled = fill.maker_filled,
                "Trade executed"
            );
            trades.push(trade);

            remaining = remaining.checked_sub(fill.quantity).unwrap_or(Quantity::zero());
        }

        (trades, remaining)
    }

    /// Place the unmatched remainder on the order's own side
    fn rest(&mut self, order_id: OrderId, side: Side, price: Price, residual: Quantity) -> Result<u64, EngineError> {
        let sequence = self.next_order_sequence;
        self.book
            .insert(Order::new(order_id, side, price, residual, sequence))
            .ok_or_else(|| self.overflow(format!("level total at {price} cannot absorb {residual}")))?;
        self.next_order_sequence += 1;

        debug!(%order_id, ?side, %price, %residual, sequence, "Order resting");
        Ok(sequence)
    }

    /// Panic on any broken invariant; reaching one is an engine bug
    fn assert_consistent(&self, result: &SubmitResult) {
        let traded = result
            .trades
            .iter()
            .try_fold(Quantity::zero(), |sum, trade| sum.checked_add(trade.quantity));
        let conserved = traded
            .and_then(|traded| traded.checked_add(result.residual))
            .is_some_and(|total| total == result.quantity);
        if !conserved {
            error!(order_id = %result.order_id, "Quantity not conserved");
            panic!("quantity not conserved for order {}", result.order_id);
        }

        if let Err(violation) = self.book.check_invariants() {
            error!(order_id = %result.order_id, %violation, "Book invariant violated");
            panic!("book invariant violated: {violation}");
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
