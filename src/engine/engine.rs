//! The public engine façade composing book, matcher, executor, and processor.

use super::book::OrderBook;
use super::execution::{Trade, TradeExecutor, TradeListener};
use super::matching::Matcher;
use super::order::{OrderId, OrderStatus, Side};
use super::processor::OrderProcessor;
use super::snapshot::BookSnapshot;
use crate::error::EngineError;

/// A single-instrument matching engine.
///
/// Every public operation completes synchronously; within one engine,
/// operations observe a total order equal to call order. Trades are observed
/// in production order, and the registered trade callback fires before the
/// producing submission returns. A multi-instrument deployment composes one
/// engine per instrument, each owned by one worker.
///
/// # Examples
/// ```
/// use matchbook_rs::{MatchingEngine, Side};
///
/// let mut engine = MatchingEngine::new("BTCUSD");
/// engine.submit_limit(Side::Buy, 100, 10, None, None).unwrap();
/// engine.submit_limit(Side::Sell, 100, 4, None, None).unwrap();
///
/// let trades = engine.drain_trades();
/// assert_eq!(trades.len(), 1);
/// assert_eq!(trades[0].quantity, 4);
/// assert_eq!(engine.best_bid(), Some(100));
/// ```
pub struct MatchingEngine {
    processor: OrderProcessor,
}

impl MatchingEngine {
    /// Create an engine with an empty book for the given symbol.
    pub fn new(symbol: &str) -> Self {
        let matcher = Matcher::new(OrderBook::new(symbol), TradeExecutor::new());
        Self {
            processor: OrderProcessor::new(matcher),
        }
    }

    /// Submit a limit order. Returns the assigned order id.
    ///
    /// When `timestamp` is `None` the engine reads the wall clock; `symbol`
    /// tags the order and any trades it produces.
    ///
    /// # Errors
    /// [`EngineError::InvalidQuantity`] / [`EngineError::InvalidPrice`] for
    /// zero inputs; the book and trade log are left untouched.
    pub fn submit_limit(
        &mut self,
        side: Side,
        price: u128,
        quantity: u64,
        timestamp: Option<u64>,
        symbol: Option<&str>,
    ) -> Result<OrderId, EngineError> {
        self.processor.submit_limit(side, price, quantity, timestamp, symbol)
    }

    /// Submit a market order. Returns the assigned order id.
    ///
    /// A market order against an empty opposite book produces no trades and
    /// is discarded, which is not an error.
    ///
    /// # Errors
    /// [`EngineError::InvalidQuantity`] for zero quantity.
    pub fn submit_market(
        &mut self,
        side: Side,
        quantity: u64,
        timestamp: Option<u64>,
        symbol: Option<&str>,
    ) -> Result<OrderId, EngineError> {
        self.processor.submit_market(side, quantity, timestamp, symbol)
    }

    /// Cancel a resting order.
    ///
    /// Returns `true` iff an order with that id was resting and has been
    /// removed. Cancelling the same id again returns `false`.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        self.processor.cancel(order_id)
    }

    /// Snapshot of every price level on both sides.
    pub fn snapshot(&mut self) -> BookSnapshot {
        self.book_mut().create_snapshot(usize::MAX)
    }

    /// Snapshot of the top `depth` price levels per side.
    pub fn snapshot_with_depth(&mut self, depth: usize) -> BookSnapshot {
        self.book_mut().create_snapshot(depth)
    }

    /// All price levels of one side as `(price, aggregate quantity)` in
    /// matching priority order.
    pub fn levels(&mut self, side: Side) -> Vec<(u128, u64)> {
        self.book_mut().levels(side)
    }

    /// Returns and clears the trades executed since the last drain, in
    /// production order.
    pub fn drain_trades(&mut self) -> Vec<Trade> {
        self.processor.matcher.executor.drain_trades()
    }

    /// Copies of recent trades, optionally filtered by symbol, limited to
    /// the most recent `limit`. Does not clear the log.
    pub fn trades(&self, symbol: Option<&str>, limit: usize) -> Vec<Trade> {
        self.processor.matcher.executor.trades(symbol, limit)
    }

    /// Hand previously drained trades back to the recycling pool.
    pub fn recycle_trades(&mut self, drained: Vec<Trade>) {
        self.processor.matcher.executor.recycle_trades(drained);
    }

    /// Move up to `count` of the most recent logged trades into the pool.
    pub fn recycle_recent_trades(&mut self, count: usize) {
        self.processor.matcher.executor.recycle_recent(count);
    }

    /// Register a callback invoked synchronously after each trade, before
    /// the producing submission returns. At most one callback is held; a
    /// later registration replaces it.
    pub fn register_trade_callback(&mut self, listener: TradeListener) {
        self.processor.matcher.executor.register_listener(listener);
    }

    /// Best bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<u128> {
        self.book().best_bid()
    }

    /// Best ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<u128> {
        self.book().best_ask()
    }

    /// Mid price (average of best bid and best ask).
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        self.book().mid_price()
    }

    /// Spread (best ask - best bid).
    #[must_use]
    pub fn spread(&self) -> Option<u128> {
        self.book().spread()
    }

    /// Price of the most recent trade, if any trade has occurred.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<u128> {
        self.book().last_trade_price()
    }

    /// Status of a resting order, `None` when the id is unknown or the
    /// order already left the book.
    #[must_use]
    pub fn order_status(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.book().get_order(order_id).map(|o| o.status)
    }

    /// Number of orders currently resting in the book.
    #[must_use]
    pub fn open_orders(&self) -> usize {
        self.book().order_count()
    }

    /// The symbol this engine trades.
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.book().symbol()
    }

    fn book(&self) -> &OrderBook {
        &self.processor.matcher.book
    }

    fn book_mut(&mut self) -> &mut OrderBook {
        &mut self.processor.matcher.book
    }
}
