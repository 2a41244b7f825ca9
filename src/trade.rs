//! Trade records produced by the matching engine.
//!
//! A Trade pairs the two sides of one execution. Each side reports its own
//! resting limit price, so the economic execution price is the passive
//! side's entry; the symmetry keeps the record side-agnostic.

use crate::order::{OrderId, Price, Quantity};

/// One side's view of an execution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TradeInfo {
    pub order_id: OrderId,
    /// The order's own limit price, not necessarily the execution price.
    pub price: Price,
    pub quantity: Quantity,
}

/// A single execution between the head bid and the head ask.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Trade {
    pub bid: TradeInfo,
    pub ask: TradeInfo,
}

pub type Trades = Vec<Trade>;
