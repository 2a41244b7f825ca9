//! Order domain types.
//!
//! Prices are integral ticks, quantities are unsigned base units, and order
//! ids are supplied by the caller (the book never generates them). The five
//! order types differ only in their admission and lifetime policy; once an
//! order rests, matching treats them all alike.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Price in integral ticks. Signed: some instruments trade through zero.
pub type Price = i32;
/// Order quantity in base units.
pub type Quantity = u32;
/// Caller-supplied order identifier, unique across both sides.
pub type OrderId = u64;

/// Side of the book an order belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side this order matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

/// Tried to parse a [`Side`] from an unrecognized string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid side: {0:?}")]
pub struct ParseSideError(String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

/// Admission and lifetime policy of an order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Rests until filled or explicitly cancelled.
    GoodTillCancel,
    /// Matches what it can immediately; any residual is cancelled.
    FillAndKill,
    /// Matches in full immediately or is rejected with no state change.
    FillOrKill,
    /// Rests until the market close, at which point it is cancelled.
    GoodForDay,
    /// No limit price; rewritten on admission to a good-till-cancel at the
    /// worst opposing price.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderType::GoodTillCancel => "good_till_cancel",
            OrderType::FillAndKill => "fill_and_kill",
            OrderType::FillOrKill => "fill_or_kill",
            OrderType::GoodForDay => "good_for_day",
            OrderType::Market => "market",
        };
        f.write_str(name)
    }
}

/// Tried to parse an [`OrderType`] from an unrecognized string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order type: {0:?}")]
pub struct ParseOrderTypeError(String);

impl FromStr for OrderType {
    type Err = ParseOrderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good_till_cancel" => Ok(OrderType::GoodTillCancel),
            "fill_and_kill" => Ok(OrderType::FillAndKill),
            "fill_or_kill" => Ok(OrderType::FillOrKill),
            "good_for_day" => Ok(OrderType::GoodForDay),
            "market" => Ok(OrderType::Market),
            other => Err(ParseOrderTypeError(other.to_string())),
        }
    }
}

/// A single order. Matching mutates only `remaining_quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Price,
    pub initial_quantity: Quantity,
    pub remaining_quantity: Quantity,
}

impl Order {
    /// A fresh, unfilled order.
    ///
    /// Panics when `quantity` is zero: a zero-quantity order is a caller
    /// bug, not a rejectable input.
    pub fn new(
        id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        assert!(quantity > 0, "order #{id} must have a positive quantity");
        Order {
            id,
            side,
            order_type,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// A market order. Its price is a placeholder until admission rewrites
    /// it to the worst opposing price.
    pub fn market(id: OrderId, side: Side, quantity: Quantity) -> Self {
        Order::new(id, side, OrderType::Market, 0, quantity)
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Execute `quantity` against this order.
    ///
    /// Panics when `quantity` exceeds the remaining quantity: matching
    /// never asks for more than `min` of the two heads, so an over-fill
    /// means a broken book invariant.
    pub fn fill(&mut self, quantity: Quantity) {
        assert!(
            quantity <= self.remaining_quantity,
            "order #{} cannot fill {} with only {} remaining",
            self.id,
            quantity,
            self.remaining_quantity
        );
        self.remaining_quantity -= quantity;
    }

    /// Rewrite a market order into a good-till-cancel limit at `price`.
    pub(crate) fn to_good_till_cancel(&mut self, price: Price) {
        debug_assert!(self.order_type == OrderType::Market);
        self.order_type = OrderType::GoodTillCancel;
        self.price = price;
    }
}

/// A modification request: cancel + re-add keeping the original order type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OrderModify {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderModify {
    pub fn new(order_id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        OrderModify {
            order_id,
            side,
            price,
            quantity,
        }
    }

    /// The replacement order carrying the original's type.
    pub(crate) fn into_order(self, order_type: OrderType) -> Order {
        Order::new(self.order_id, self.side, order_type, self.price, self.quantity)
    }
}
