//! Price-time priority matching for one incoming order.

use super::book::OrderBook;
use super::execution::TradeExecutor;
use super::order::{Order, OrderType, Side};
use std::sync::atomic::Ordering;
use tracing::trace;

/// Walks the opposite side of the book in price priority, draining resting
/// orders in arrival order at each level, producing trades until the
/// incoming order is exhausted or no further price crosses.
///
/// One code path serves both sides: the direction switch selects which map
/// is walked and from which end. Within a level, matching is strictly FIFO;
/// every trade executes at the resting order's price.
pub struct Matcher {
    pub(super) book: OrderBook,
    pub(super) executor: TradeExecutor,
}

impl Matcher {
    /// Create a matcher over the given book and trade executor.
    pub fn new(book: OrderBook, executor: TradeExecutor) -> Self {
        Self { book, executor }
    }

    /// Match an incoming order against the book.
    ///
    /// A limit order with remaining quantity after the walk rests on its own
    /// side. A market order never rests: leftovers are discarded, leaving
    /// the order `New` (no fills at all) or `PartiallyFilled`.
    ///
    /// The admission layer guarantees positive quantity and, for limit
    /// orders, a positive price, so no failure paths exist here; anything
    /// inconsistent is a bug and trips a debug assertion.
    pub fn match_order(&mut self, mut order: Order) {
        let side = order.side;
        debug_assert!(order.remaining_quantity > 0);

        loop {
            if order.remaining_quantity == 0 {
                break;
            }

            // Best opposite price in matching priority: lowest ask for an
            // incoming buy, highest bid for an incoming sell.
            let best = match side {
                Side::Buy => self.book.asks.keys().next().copied(),
                Side::Sell => self.book.bids.keys().next_back().copied(),
            };
            let Some(price) = best else { break };

            // Limit orders stop at the first non-crossing level. Market
            // orders (price None) take every level until exhausted.
            if let Some(limit) = order.price {
                let crosses = match side {
                    Side::Buy => price <= limit,
                    Side::Sell => price >= limit,
                };
                if !crosses {
                    break;
                }
            }

            let book_side = match side {
                Side::Buy => &mut self.book.asks,
                Side::Sell => &mut self.book.bids,
            };
            let Some(level) = book_side.get_mut(&price) else {
                break;
            };

            // Drain the level FIFO head-to-tail.
            let mut traded = false;
            while order.remaining_quantity > 0 {
                let (fill_qty, resting_filled) = {
                    let Some(resting) = level.front_mut() else { break };
                    let fill_qty = order.remaining_quantity.min(resting.remaining_quantity);
                    order.apply_fill(fill_qty);
                    resting.apply_fill(fill_qty);

                    let (buy, sell) = match side {
                        Side::Buy => (&order, &*resting),
                        Side::Sell => (&*resting, &order),
                    };
                    self.executor.execute(buy, sell, price, fill_qty);
                    (fill_qty, resting.remaining_quantity == 0)
                };
                traded = true;
                level.reduce_total(fill_qty);

                if resting_filled {
                    // Fully filled makers leave the book immediately, index
                    // entry included.
                    if let Some(filled) = level.pop_front() {
                        self.book.order_locations.remove(&filled.id);
                    }
                }
            }

            let emptied = level.is_empty();
            if emptied {
                book_side.remove(&price);
            }

            if traded {
                self.book.last_trade_price.store(price);
                self.book.has_traded.store(true, Ordering::Relaxed);
            }

            // A level with liquidity left means the incoming order ran out.
            if !emptied {
                break;
            }
        }

        if order.order_type == OrderType::Limit && order.remaining_quantity > 0 {
            self.book.insert(order);
        } else if order.remaining_quantity > 0 {
            trace!(
                "Market order {} discarded with {} unfilled",
                order.id, order.remaining_quantity
            );
        }

        self.book.debug_assert_consistent();
    }
}
