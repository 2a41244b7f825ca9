//! Book core: price ladders, order arena, and the matching engine.
//!
//! Two BTreeMap ladders map price to a FIFO queue of resting orders. Each
//! queue is an intrusive doubly-linked list of nodes owned by a slab arena,
//! so a cancel unlinks in O(1) straight from the order index. Every level
//! carries running aggregates (total quantity, order count) which answer
//! fill-or-kill feasibility without walking individual orders.
//!
//! The core is single-threaded; the [`Orderbook`](super::Orderbook) shell
//! serializes access behind one mutex.

use crate::order::{Order, OrderId, OrderModify, OrderType, Price, Quantity, Side};
use crate::trade::{Trade, TradeInfo, Trades};
use slab::Slab;
use std::cmp;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::{LevelInfo, LevelInfos};

/// Node owned by the arena and linked within a price level's FIFO queue.
#[derive(Debug)]
struct OrderNode {
    order: Order,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A single price level: queue endpoints plus running aggregates.
///
/// `order_count` always equals the number of linked nodes and
/// `total_quantity` the sum of their remaining quantities.
#[derive(Debug, Default)]
struct PriceLevel {
    head: Option<usize>,
    tail: Option<usize>,
    total_quantity: Quantity,
    order_count: usize,
}

impl PriceLevel {
    /// Append a freshly inserted node to the back of the queue and grow the
    /// aggregates.
    fn push_back(&mut self, arena: &mut Slab<OrderNode>, idx: usize) {
        match self.tail {
            Some(tail) => {
                arena[tail].next = Some(idx);
                arena[idx].prev = Some(tail);
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.total_quantity += arena[idx].order.remaining_quantity;
        self.order_count += 1;
    }

    /// Unlink a node and shrink the aggregates by its remaining quantity.
    fn unlink(&mut self, arena: &mut Slab<OrderNode>, idx: usize) {
        let prev = arena[idx].prev;
        let next = arena[idx].next;
        match prev {
            Some(p) => arena[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena[n].prev = prev,
            None => self.tail = prev,
        }
        arena[idx].prev = None;
        arena[idx].next = None;
        self.total_quantity -= arena[idx].order.remaining_quantity;
        self.order_count -= 1;
    }
}

/// The book's four mutually consistent indices: the two ladders, the order
/// arena, and the id index. An order id is present in `index` iff its node
/// is linked into exactly one level of the matching side's ladder.
#[derive(Debug, Default)]
pub(crate) struct BookCore {
    arena: Slab<OrderNode>,
    index: HashMap<OrderId, usize>,
    /// Bid ladder; best bid is the last key.
    bids: BTreeMap<Price, PriceLevel>,
    /// Ask ladder; best ask is the first key.
    asks: BTreeMap<Price, PriceLevel>,
}

impl BookCore {
    /// Admit an order and run the matching pass.
    ///
    /// Duplicate ids, market orders facing an empty opposing ladder, and
    /// fill-and-kill / fill-or-kill orders failing their gate all return an
    /// empty trade list without touching the book.
    pub(crate) fn add_order(&mut self, mut order: Order) -> Trades {
        if self.index.contains_key(&order.id) {
            debug!(order_id = order.id, "duplicate order id, ignoring");
            return Trades::new();
        }

        // A market order becomes a good-till-cancel limit at the worst
        // opposing price: it crosses every resting opposing level and any
        // residual rests there.
        if order.order_type == OrderType::Market {
            match self.worst_opposing_price(order.side) {
                Some(price) => order.to_good_till_cancel(price),
                None => {
                    debug!(order_id = order.id, "market order against empty book, rejecting");
                    return Trades::new();
                }
            }
        }

        if order.order_type == OrderType::FillAndKill && !self.can_match(order.side, order.price) {
            debug!(order_id = order.id, "fill-and-kill does not cross, rejecting");
            return Trades::new();
        }

        if order.order_type == OrderType::FillOrKill
            && !self.can_fully_fill(order.side, order.price, order.initial_quantity)
        {
            debug!(order_id = order.id, "fill-or-kill cannot fully fill, rejecting");
            return Trades::new();
        }

        let (id, side, price) = (order.id, order.side, order.price);
        let idx = self.arena.insert(OrderNode {
            order,
            prev: None,
            next: None,
        });
        self.index.insert(id, idx);
        let level = match side {
            Side::Buy => self.bids.entry(price).or_default(),
            Side::Sell => self.asks.entry(price).or_default(),
        };
        level.push_back(&mut self.arena, idx);
        trace!(order_id = id, %side, price, "order rested");

        self.match_orders()
    }

    /// Cancel a resting order; unknown ids are ignored.
    pub(crate) fn cancel_order(&mut self, order_id: OrderId) {
        let Some(&idx) = self.index.get(&order_id) else {
            debug!(order_id, "cancel for unknown order id, ignoring");
            return;
        };
        self.remove_order(idx);
        debug!(order_id, "order cancelled");
    }

    /// Cancel + re-add under the original order type. Time priority resets.
    pub(crate) fn modify_order(&mut self, modify: OrderModify) -> Trades {
        let Some(&idx) = self.index.get(&modify.order_id) else {
            debug!(order_id = modify.order_id, "modify for unknown order id, ignoring");
            return Trades::new();
        };
        let order_type = self.arena[idx].order.order_type;
        self.cancel_order(modify.order_id);
        self.add_order(modify.into_order(order_type))
    }

    /// Number of resting orders.
    pub(crate) fn size(&self) -> usize {
        self.index.len()
    }

    /// Aggregate depth: bids best-first (descending), asks best-first
    /// (ascending). Level quantities come straight from the aggregates.
    pub(crate) fn level_infos(&self) -> LevelInfos {
        LevelInfos {
            bids: self
                .bids
                .iter()
                .rev()
                .map(|(&price, level)| LevelInfo {
                    price,
                    quantity: level.total_quantity,
                })
                .collect(),
            asks: self
                .asks
                .iter()
                .map(|(&price, level)| LevelInfo {
                    price,
                    quantity: level.total_quantity,
                })
                .collect(),
        }
    }

    /// Ids of every resting good-for-day order, for the close-time sweep.
    pub(crate) fn good_for_day_ids(&self) -> Vec<OrderId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.order.order_type == OrderType::GoodForDay)
            .map(|(_, node)| node.order.id)
            .collect()
    }

    fn best_bid(&self) -> Option<Price> {
        self.bids.last_key_value().map(|(&price, _)| price)
    }

    fn best_ask(&self) -> Option<Price> {
        self.asks.first_key_value().map(|(&price, _)| price)
    }

    /// The worst price resting on the ladder opposing `side`.
    fn worst_opposing_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.asks.last_key_value().map(|(&price, _)| price),
            Side::Sell => self.bids.first_key_value().map(|(&price, _)| price),
        }
    }

    /// Whether an order of `side` at `price` would cross the opposing best.
    fn can_match(&self, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.best_ask().is_some_and(|ask| price >= ask),
            Side::Sell => self.best_bid().is_some_and(|bid| price <= bid),
        }
    }

    /// Whether the opposing ladder holds at least `quantity` at prices no
    /// worse than `price`. Walks the level aggregates from the opposing
    /// best toward the limit; individual orders are never inspected.
    fn can_fully_fill(&self, side: Side, price: Price, quantity: Quantity) -> bool {
        if !self.can_match(side, price) {
            return false;
        }

        let mut remaining = quantity;
        match side {
            Side::Buy => {
                for (&level_price, level) in self.asks.iter() {
                    if level_price > price {
                        break;
                    }
                    if remaining <= level.total_quantity {
                        return true;
                    }
                    remaining -= level.total_quantity;
                }
            }
            Side::Sell => {
                for (&level_price, level) in self.bids.iter().rev() {
                    if level_price < price {
                        break;
                    }
                    if remaining <= level.total_quantity {
                        return true;
                    }
                    remaining -= level.total_quantity;
                }
            }
        }
        false
    }

    /// Price-time matching pass, run after every successful admission.
    ///
    /// While the best bid crosses the best ask, the two head orders fill
    /// each other for the smaller remaining quantity; fully filled heads
    /// leave the book, drained levels leave their ladder, and the loop then
    /// reconsults the tops. Afterwards any fill-and-kill residual left at
    /// either top is cancelled so those orders never rest.
    fn match_orders(&mut self) -> Trades {
        let mut trades = Trades::new();

        loop {
            let (Some(bid_price), Some(ask_price)) = (self.best_bid(), self.best_ask()) else {
                break;
            };
            if bid_price < ask_price {
                break;
            }

            // Fill the heads of the two best levels against each other
            // until one of the levels drains.
            loop {
                let bid_level = self.bids.get_mut(&bid_price).expect("best level exists");
                let ask_level = self.asks.get_mut(&ask_price).expect("best level exists");
                let bid_idx = bid_level.head.expect("level is never empty");
                let ask_idx = ask_level.head.expect("level is never empty");

                let quantity = cmp::min(
                    self.arena[bid_idx].order.remaining_quantity,
                    self.arena[ask_idx].order.remaining_quantity,
                );
                self.arena[bid_idx].order.fill(quantity);
                self.arena[ask_idx].order.fill(quantity);
                // The traded quantity leaves both level aggregates.
                bid_level.total_quantity -= quantity;
                ask_level.total_quantity -= quantity;

                trades.push(Trade {
                    bid: TradeInfo {
                        order_id: self.arena[bid_idx].order.id,
                        price: self.arena[bid_idx].order.price,
                        quantity,
                    },
                    ask: TradeInfo {
                        order_id: self.arena[ask_idx].order.id,
                        price: self.arena[ask_idx].order.price,
                        quantity,
                    },
                });

                if self.arena[bid_idx].order.is_filled() {
                    self.remove_order(bid_idx);
                }
                if self.arena[ask_idx].order.is_filled() {
                    self.remove_order(ask_idx);
                }

                if !self.bids.contains_key(&bid_price) || !self.asks.contains_key(&ask_price) {
                    break;
                }
            }
        }

        // Fill-and-kill orders never rest: a residual left at either top
        // after matching is cancelled outright.
        for side in [Side::Buy, Side::Sell] {
            if let Some(order_id) = self.top_fill_and_kill(side) {
                debug!(order_id, "cancelling fill-and-kill residual");
                self.cancel_order(order_id);
            }
        }

        trades
    }

    /// Id of the head order of `side`'s best level, when it is
    /// fill-and-kill.
    fn top_fill_and_kill(&self, side: Side) -> Option<OrderId> {
        let (_, level) = match side {
            Side::Buy => self.bids.last_key_value()?,
            Side::Sell => self.asks.first_key_value()?,
        };
        let head = level.head.expect("level is never empty");
        let order = &self.arena[head].order;
        (order.order_type == OrderType::FillAndKill).then_some(order.id)
    }

    /// Unlink `idx` from its level, erase the level when it empties, and
    /// release the node from the arena and the order index.
    fn remove_order(&mut self, idx: usize) -> Order {
        let side = self.arena[idx].order.side;
        let price = self.arena[idx].order.price;

        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = ladder.get_mut(&price).expect("resting order has a level");
        level.unlink(&mut self.arena, idx);
        if level.order_count == 0 {
            ladder.remove(&price);
        }

        let node = self.arena.remove(idx);
        self.index.remove(&node.order.id);
        node.order
    }

    #[cfg(test)]
    fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.index.get(&order_id).map(|&idx| &self.arena[idx].order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn o(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
        Order::new(id, side, OrderType::GoodTillCancel, price, quantity)
    }

    fn typed(id: OrderId, side: Side, order_type: OrderType, price: Price, quantity: Quantity) -> Order {
        Order::new(id, side, order_type, price, quantity)
    }

    /// Walk every structure and assert the cross-index invariants: the
    /// index and the ladders agree, aggregates match the queues, no level
    /// is empty, quantities are sane, and the book is never left crossed.
    fn check_invariants(book: &BookCore) {
        let mut linked = 0usize;
        for (side, ladder) in [(Side::Buy, &book.bids), (Side::Sell, &book.asks)] {
            for (&price, level) in ladder {
                assert!(level.order_count > 0, "empty level left at {price}");

                let mut count = 0usize;
                let mut quantity = 0u64;
                let mut prev = None;
                let mut cursor = level.head;
                while let Some(idx) = cursor {
                    let node = &book.arena[idx];
                    assert_eq!(node.prev, prev, "broken back-link at {price}");
                    assert_eq!(node.order.side, side);
                    assert_eq!(node.order.price, price);
                    assert!(node.order.remaining_quantity > 0);
                    assert!(node.order.remaining_quantity <= node.order.initial_quantity);
                    assert_eq!(
                        book.index.get(&node.order.id),
                        Some(&idx),
                        "order #{} not indexed at its node",
                        node.order.id
                    );
                    count += 1;
                    quantity += u64::from(node.order.remaining_quantity);
                    prev = cursor;
                    cursor = node.next;
                }
                assert_eq!(level.tail, prev, "tail does not close the queue at {price}");
                assert_eq!(level.order_count, count, "count aggregate off at {price}");
                assert_eq!(
                    u64::from(level.total_quantity),
                    quantity,
                    "quantity aggregate off at {price}"
                );
                linked += count;
            }
        }
        assert_eq!(book.index.len(), linked, "index and ladders disagree");
        assert_eq!(book.size(), linked);

        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            assert!(bid < ask, "book left crossed: {bid} >= {ask}");
        }
    }

    fn trade(bid: (OrderId, Price, Quantity), ask: (OrderId, Price, Quantity)) -> Trade {
        Trade {
            bid: TradeInfo {
                order_id: bid.0,
                price: bid.1,
                quantity: bid.2,
            },
            ask: TradeInfo {
                order_id: ask.0,
                price: ask.1,
                quantity: ask.2,
            },
        }
    }

    #[test]
    fn simple_cross_empties_the_book() {
        let mut book = BookCore::default();
        assert!(book.add_order(o(1, Side::Buy, 100, 10)).is_empty());
        let trades = book.add_order(o(2, Side::Sell, 100, 10));

        assert_eq!(trades, vec![trade((1, 100, 10), (2, 100, 10))]);
        assert_eq!(book.size(), 0);
        check_invariants(&book);
    }

    #[test]
    fn partial_fill_rests_the_residual() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 10));
        let trades = book.add_order(o(2, Side::Sell, 100, 4));

        assert_eq!(trades, vec![trade((1, 100, 4), (2, 100, 4))]);
        assert_eq!(book.size(), 1);
        let depth = book.level_infos();
        assert_eq!(depth.bids, vec![LevelInfo { price: 100, quantity: 6 }]);
        assert!(depth.asks.is_empty());
        check_invariants(&book);
    }

    #[test]
    fn fill_or_kill_rejects_when_not_fully_fillable() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 5));
        let before = book.level_infos();

        let trades = book.add_order(typed(2, Side::Buy, OrderType::FillOrKill, 101, 10));
        assert!(trades.is_empty());
        assert_eq!(book.size(), 1);
        assert!(book.order(2).is_none(), "rejected FOK must not rest");
        assert_eq!(book.level_infos(), before, "rejection must not mutate the book");
        check_invariants(&book);
    }

    #[test]
    fn fill_or_kill_sweeps_multiple_levels() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 5));
        book.add_order(o(2, Side::Sell, 102, 5));

        let trades = book.add_order(typed(3, Side::Buy, OrderType::FillOrKill, 102, 8));
        assert_eq!(
            trades,
            vec![trade((3, 102, 5), (1, 101, 5)), trade((3, 102, 3), (2, 102, 3))]
        );
        assert!(book.order(3).is_none(), "fully filled FOK must leave the book");
        assert_eq!(
            book.level_infos().asks,
            vec![LevelInfo { price: 102, quantity: 2 }]
        );
        check_invariants(&book);
    }

    #[test]
    fn fill_or_kill_ignores_levels_beyond_the_limit() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 5));
        book.add_order(o(2, Side::Sell, 105, 50));

        // Plenty of quantity at 105, but the limit stops at 102.
        let trades = book.add_order(typed(3, Side::Buy, OrderType::FillOrKill, 102, 8));
        assert!(trades.is_empty());
        assert_eq!(book.size(), 2);
        check_invariants(&book);
    }

    #[test]
    fn fill_and_kill_takes_what_it_can_and_never_rests() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 3));

        let trades = book.add_order(typed(2, Side::Buy, OrderType::FillAndKill, 101, 10));
        assert_eq!(trades, vec![trade((2, 101, 3), (1, 101, 3))]);
        assert_eq!(book.size(), 0, "FAK residual must be cancelled by the sweep");
        check_invariants(&book);
    }

    #[test]
    fn fill_and_kill_rejects_without_a_cross() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 105, 3));
        let before = book.level_infos();

        let trades = book.add_order(typed(2, Side::Buy, OrderType::FillAndKill, 101, 10));
        assert!(trades.is_empty());
        assert_eq!(book.level_infos(), before);
        assert_eq!(book.size(), 1);
        check_invariants(&book);
    }

    #[test]
    fn fill_and_kill_sell_crosses_a_bid_only_book() {
        // The crossing test for a sell consults the bid ladder; a bid-only
        // book must not reject it.
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 5));

        let trades = book.add_order(typed(2, Side::Sell, OrderType::FillAndKill, 100, 5));
        assert_eq!(trades, vec![trade((1, 100, 5), (2, 100, 5))]);
        assert_eq!(book.size(), 0);
        check_invariants(&book);
    }

    #[test]
    fn market_order_sweeps_and_rests_residual_at_worst_price() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 2));
        book.add_order(o(2, Side::Sell, 103, 2));

        let trades = book.add_order(Order::market(3, Side::Buy, 10));
        assert_eq!(
            trades,
            vec![trade((3, 103, 2), (1, 101, 2)), trade((3, 103, 2), (2, 103, 2))]
        );

        let resting = book.order(3).expect("residual rests");
        assert_eq!(resting.order_type, OrderType::GoodTillCancel);
        assert_eq!(resting.price, 103);
        assert_eq!(resting.remaining_quantity, 6);

        let depth = book.level_infos();
        assert_eq!(depth.bids, vec![LevelInfo { price: 103, quantity: 6 }]);
        assert!(depth.asks.is_empty());
        check_invariants(&book);
    }

    #[test]
    fn market_order_against_empty_book_is_rejected() {
        let mut book = BookCore::default();
        assert!(book.add_order(Order::market(1, Side::Buy, 10)).is_empty());
        assert_eq!(book.size(), 0);

        book.add_order(o(2, Side::Buy, 100, 5));
        // A market sell faces bids, not asks.
        let trades = book.add_order(Order::market(3, Side::Sell, 2));
        assert_eq!(trades, vec![trade((2, 100, 2), (3, 100, 2))]);
        check_invariants(&book);
    }

    #[test]
    fn duplicate_order_id_is_ignored_even_when_it_would_cross() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 10));
        let before = book.level_infos();

        let trades = book.add_order(o(1, Side::Sell, 90, 5));
        assert!(trades.is_empty());
        assert_eq!(book.level_infos(), before);
        assert_eq!(book.order(1).unwrap().side, Side::Buy);
        check_invariants(&book);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 10));
        book.add_order(o(2, Side::Buy, 100, 3));

        book.cancel_order(1);
        let after_first = book.level_infos();
        book.cancel_order(1);
        assert_eq!(book.level_infos(), after_first);
        assert_eq!(book.size(), 1);
        check_invariants(&book);
    }

    #[test]
    fn cancel_middle_of_queue_preserves_fifo() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 1));
        book.add_order(o(2, Side::Buy, 100, 2));
        book.add_order(o(3, Side::Buy, 100, 3));
        book.cancel_order(2);
        check_invariants(&book);

        // 1 then 3 should fill, in that order.
        let trades = book.add_order(o(4, Side::Sell, 100, 4));
        assert_eq!(
            trades,
            vec![trade((1, 100, 1), (4, 100, 1)), trade((3, 100, 3), (4, 100, 3))]
        );
        assert_eq!(book.size(), 0);
        check_invariants(&book);
    }

    #[test]
    fn cancel_last_order_erases_the_level() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 5));
        book.cancel_order(1);

        assert_eq!(book.size(), 0);
        assert!(book.level_infos().asks.is_empty());
        check_invariants(&book);
    }

    #[test]
    fn modify_loses_time_priority() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 5));
        book.add_order(o(2, Side::Buy, 100, 5));

        let trades = book.modify_order(OrderModify::new(1, Side::Buy, 100, 5));
        assert!(trades.is_empty());
        check_invariants(&book);

        // The queue at 100 is now [2, 1].
        let trades = book.add_order(o(3, Side::Sell, 100, 5));
        assert_eq!(trades, vec![trade((2, 100, 5), (3, 100, 5))]);
        assert_eq!(book.order(1).unwrap().remaining_quantity, 5);
        check_invariants(&book);
    }

    #[test]
    fn modify_matches_cancel_plus_add() {
        let seed = || {
            let mut book = BookCore::default();
            book.add_order(o(1, Side::Buy, 100, 5));
            book.add_order(o(2, Side::Sell, 105, 5));
            book
        };

        let mut modified = seed();
        let trades_a = modified.modify_order(OrderModify::new(1, Side::Sell, 104, 7));

        let mut manual = seed();
        manual.cancel_order(1);
        let trades_b = manual.add_order(o(1, Side::Sell, 104, 7));

        assert_eq!(trades_a, trades_b);
        assert_eq!(modified.level_infos(), manual.level_infos());
        assert_eq!(modified.size(), manual.size());
        check_invariants(&modified);
    }

    #[test]
    fn modify_keeps_the_original_order_type() {
        let mut book = BookCore::default();
        book.add_order(typed(1, Side::Buy, OrderType::GoodForDay, 100, 5));
        book.modify_order(OrderModify::new(1, Side::Buy, 99, 5));

        assert_eq!(book.order(1).unwrap().order_type, OrderType::GoodForDay);
        assert_eq!(book.good_for_day_ids(), vec![1]);
        check_invariants(&book);
    }

    #[test]
    fn modify_unknown_id_is_a_no_op() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 5));
        let before = book.level_infos();

        assert!(book.modify_order(OrderModify::new(42, Side::Buy, 100, 5)).is_empty());
        assert_eq!(book.level_infos(), before);
        check_invariants(&book);
    }

    #[test]
    fn incoming_sweep_crosses_multiple_levels_in_price_order() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Sell, 101, 2));
        book.add_order(o(2, Side::Sell, 102, 3));
        book.add_order(o(3, Side::Sell, 101, 1));

        let trades = book.add_order(o(4, Side::Buy, 103, 10));
        assert_eq!(
            trades,
            vec![
                trade((4, 103, 2), (1, 101, 2)),
                trade((4, 103, 1), (3, 101, 1)),
                trade((4, 103, 3), (2, 102, 3)),
            ]
        );
        assert_eq!(
            book.level_infos().bids,
            vec![LevelInfo { price: 103, quantity: 4 }]
        );
        check_invariants(&book);
    }

    #[test]
    fn depth_orders_bids_descending_and_asks_ascending() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, 100, 5));
        book.add_order(o(2, Side::Buy, 101, 1));
        book.add_order(o(3, Side::Buy, 100, 2));
        book.add_order(o(4, Side::Sell, 102, 7));
        book.add_order(o(5, Side::Sell, 103, 2));

        let depth = book.level_infos();
        assert_eq!(
            depth.bids,
            vec![
                LevelInfo { price: 101, quantity: 1 },
                LevelInfo { price: 100, quantity: 7 },
            ]
        );
        assert_eq!(
            depth.asks,
            vec![
                LevelInfo { price: 102, quantity: 7 },
                LevelInfo { price: 103, quantity: 2 },
            ]
        );
        check_invariants(&book);
    }

    #[test]
    fn good_for_day_sweep_lists_only_day_orders() {
        let mut book = BookCore::default();
        book.add_order(typed(1, Side::Buy, OrderType::GoodForDay, 99, 5));
        book.add_order(o(2, Side::Buy, 98, 5));
        book.add_order(typed(3, Side::Sell, OrderType::GoodForDay, 110, 5));

        let mut ids = book.good_for_day_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);

        for id in ids {
            book.cancel_order(id);
        }
        assert_eq!(book.size(), 1);
        assert!(book.good_for_day_ids().is_empty());
        check_invariants(&book);
    }

    #[test]
    fn negative_prices_keep_ladder_order() {
        let mut book = BookCore::default();
        book.add_order(o(1, Side::Buy, -5, 1));
        book.add_order(o(2, Side::Buy, -2, 1));
        book.add_order(o(3, Side::Sell, -1, 1));
        check_invariants(&book);

        let trades = book.add_order(o(4, Side::Sell, -2, 1));
        assert_eq!(trades, vec![trade((2, -2, 1), (4, -2, 1))]);
        check_invariants(&book);
    }
}
