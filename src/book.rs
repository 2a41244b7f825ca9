//! Thread-safe order book and the day-order pruner.
//!
//! [`Orderbook`] guards the core's four indices behind a single mutex; every
//! public operation acquires it for the whole operation, so callers observe
//! the book in lock-acquisition order and each add's trades arrive as one
//! batch. Throughput comes from short critical sections, not sharding.
//!
//! A background thread owned by the book wakes just after the configured
//! market close and cancels every resting good-for-day order. Dropping the
//! book flips an atomic flag, signals the thread out of its timed wait, and
//! joins it.

pub mod core;

use crate::book::core::BookCore;
use crate::order::{Order, OrderId, OrderModify, Price, Quantity};
use crate::trade::Trades;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use time::macros::time;
use time::{OffsetDateTime, Time, UtcOffset};
use tracing::info;

/// Aggregated depth at a single price level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    /// Price level.
    pub price: Price,
    /// Total resting quantity at this price level.
    pub quantity: Quantity,
}

/// A value snapshot of both sides of the book.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelInfos {
    /// Bid levels in descending price order.
    pub bids: Vec<LevelInfo>,
    /// Ask levels in ascending price order.
    pub asks: Vec<LevelInfo>,
}

/// Local time of day at which good-for-day orders expire by default.
pub const DEFAULT_MARKET_CLOSE: Time = time!(16:00);

struct Shared {
    core: Mutex<BookCore>,
    /// Signals the pruner out of its timed wait on shutdown.
    close_cv: Condvar,
    shutdown: AtomicBool,
    /// Market close as a local time of day.
    close: Time,
    /// Local offset resolved at construction; UTC when indeterminate.
    offset: UtcOffset,
}

/// A single-instrument limit order book with price-time priority.
///
/// All operations are safe to call from any number of threads.
pub struct Orderbook {
    shared: Arc<Shared>,
    pruner: Option<JoinHandle<()>>,
}

impl Orderbook {
    /// A book expiring day orders at the default 16:00 local close.
    pub fn new() -> Self {
        Self::with_close(DEFAULT_MARKET_CLOSE)
    }

    /// A book whose good-for-day orders expire at `close`, local time.
    pub fn with_close(close: Time) -> Self {
        let shared = Arc::new(Shared {
            core: Mutex::new(BookCore::default()),
            close_cv: Condvar::new(),
            shutdown: AtomicBool::new(false),
            close,
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        });
        let pruner = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || prune_good_for_day(&shared))
        };
        Orderbook {
            shared,
            pruner: Some(pruner),
        }
    }

    /// Submit an order, returning the trades it produced (possibly none).
    ///
    /// A duplicate id is ignored; a market order facing an empty opposing
    /// side, a fill-and-kill that does not cross, and a fill-or-kill that
    /// cannot fill in full are rejected. All of these return an empty trade
    /// list and leave the book untouched.
    pub fn add_order(&self, order: Order) -> Trades {
        self.shared.core.lock().add_order(order)
    }

    /// Cancel a resting order. Unknown ids are ignored.
    pub fn cancel_order(&self, order_id: OrderId) {
        self.shared.core.lock().cancel_order(order_id);
    }

    /// Replace a resting order's side, price, and quantity, keeping its
    /// original type. The replacement joins the back of its queue (time
    /// priority is lost) and may trade immediately; cancel and re-add run
    /// as one atomic step.
    pub fn modify_order(&self, modify: OrderModify) -> Trades {
        self.shared.core.lock().modify_order(modify)
    }

    /// Number of resting orders.
    pub fn size(&self) -> usize {
        self.shared.core.lock().size()
    }

    /// Aggregated per-level depth: bids descending, asks ascending.
    pub fn get_order_infos(&self) -> LevelInfos {
        self.shared.core.lock().level_infos()
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Orderbook {
    fn drop(&mut self) {
        // Flip the flag under the book lock so the pruner cannot slip into
        // its wait between our store and the notify.
        {
            let _core = self.shared.core.lock();
            self.shared.shutdown.store(true, Ordering::Release);
            self.shared.close_cv.notify_one();
        }
        if let Some(handle) = self.pruner.take() {
            let _ = handle.join();
        }
    }
}

/// Background loop cancelling good-for-day orders at each market close.
///
/// The wait doubles as the shutdown channel: a notify means the book is
/// being dropped, a timeout means the close deadline passed.
fn prune_good_for_day(shared: &Shared) {
    loop {
        let wait = until_next_close(shared.close, shared.offset);

        let mut core = shared.core.lock();
        if shared.shutdown.load(Ordering::Acquire) {
            return;
        }
        let timed_out = shared.close_cv.wait_for(&mut core, wait).timed_out();
        if shared.shutdown.load(Ordering::Acquire) || !timed_out {
            return;
        }

        let expired = core.good_for_day_ids();
        drop(core);

        if expired.is_empty() {
            continue;
        }
        info!(count = expired.len(), "market close, cancelling good-for-day orders");
        let mut core = shared.core.lock();
        for order_id in expired {
            core.cancel_order(order_id);
        }
    }
}

/// Duration until the next occurrence of `close` on `offset`'s wall clock,
/// padded by 100ms so the wake lands past the deadline.
fn until_next_close(close: Time, offset: UtcOffset) -> Duration {
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let mut at = now.replace_time(close);
    if at <= now {
        at += time::Duration::days(1);
    }
    (at - now).unsigned_abs() + Duration::from_millis(100)
}
