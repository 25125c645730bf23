//! Order admission: id assignment, validation, pooling, and dispatch.

use super::matching::Matcher;
use super::order::{Order, OrderId, OrderStatus, OrderType, Side};
use super::pool::OrderPool;
use crate::error::EngineError;
use crate::utils::current_time_millis;
use tracing::trace;

/// Owns the order id sequence, constructs order records (pool-first), and
/// dispatches them to the matcher. Cancellation removes the order from the
/// book, marks it `Cancelled`, and recycles the record.
pub struct OrderProcessor {
    next_order_id: OrderId,
    pub(super) matcher: Matcher,
    order_pool: OrderPool,
}

impl OrderProcessor {
    /// Create a processor that dispatches into the given matcher.
    pub fn new(matcher: Matcher) -> Self {
        Self {
            next_order_id: 1,
            matcher,
            order_pool: OrderPool::default(),
        }
    }

    /// Create and match a limit order, returning its id.
    ///
    /// # Errors
    /// Rejects zero quantity and zero price without touching the book.
    pub fn submit_limit(
        &mut self,
        side: Side,
        price: u128,
        quantity: u64,
        timestamp: Option<u64>,
        symbol: Option<&str>,
    ) -> Result<OrderId, EngineError> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity { quantity });
        }
        if price == 0 {
            return Err(EngineError::InvalidPrice { price });
        }

        let order = self.create_order(side, OrderType::Limit, Some(price), quantity, timestamp, symbol);
        let id = order.id;
        trace!("Submitting limit order {} {} {} @ {}", id, side, quantity, price);
        self.matcher.match_order(order);
        Ok(id)
    }

    /// Create and match a market order, returning its id.
    ///
    /// A market order against an empty opposite book produces no trades and
    /// is discarded; this is not an error.
    ///
    /// # Errors
    /// Rejects zero quantity without touching the book.
    pub fn submit_market(
        &mut self,
        side: Side,
        quantity: u64,
        timestamp: Option<u64>,
        symbol: Option<&str>,
    ) -> Result<OrderId, EngineError> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity { quantity });
        }

        let order = self.create_order(side, OrderType::Market, None, quantity, timestamp, symbol);
        let id = order.id;
        trace!("Submitting market order {} {} {}", id, side, quantity);
        self.matcher.match_order(order);
        Ok(id)
    }

    /// Cancel a resting order by id.
    ///
    /// Returns `true` iff an order with that id was resting and has been
    /// removed; a second cancel of the same id returns `false`.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        match self.matcher.book.remove(order_id) {
            Some(mut order) => {
                order.status = OrderStatus::Cancelled;
                trace!("Cancelled order {}", order_id);
                self.order_pool.put(order);
                true
            }
            None => false,
        }
    }

    /// Number of recycled order records currently pooled.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.order_pool.len()
    }

    fn create_order(
        &mut self,
        side: Side,
        order_type: OrderType,
        price: Option<u128>,
        quantity: u64,
        timestamp: Option<u64>,
        symbol: Option<&str>,
    ) -> Order {
        let id = self.next_order_id;
        self.next_order_id += 1;
        let ts = timestamp.unwrap_or_else(current_time_millis);

        match self.order_pool.get() {
            Some(mut order) => {
                order.reset(id, side, order_type, price, quantity, ts, symbol);
                order
            }
            None => Order::new(id, side, order_type, price, quantity, ts, symbol.map(str::to_string)),
        }
    }
}
