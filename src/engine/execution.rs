//! Trade construction, the ordered trade log, and listener notification.

use super::order::{Order, OrderId};
use super::pool::TradePool;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A single match event between a buy order and a sell order.
///
/// The price is always the resting (maker) order's price; the timestamp is
/// the later of the two order timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonic trade identifier
    pub id: u64,
    /// Id of the buy-side order
    pub buy_order_id: OrderId,
    /// Id of the sell-side order
    pub sell_order_id: OrderId,
    /// Execution price in ticks
    pub price: u128,
    /// Executed quantity in lots
    pub quantity: u64,
    /// Execution timestamp, milliseconds since epoch
    pub timestamp: u64,
    /// Instrument tag, taken from the buy side when present, else the sell side
    pub symbol: Option<String>,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade(id={}, buy_id={}, sell_id={}, price={}, qty={})",
            self.id, self.buy_order_id, self.sell_order_id, self.price, self.quantity
        )
    }
}

/// Trade listener specification using Arc for shared ownership.
///
/// The listener is invoked synchronously, in the producing thread of
/// control, after each execution and before the matcher's next step.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;

/// Constructs trade records, maintains the ordered trade log, and fires the
/// registered listener after each execution.
///
/// The executor exclusively owns the trade log until it is drained. Drained
/// trades can be handed back through [`TradeExecutor::recycle_trades`] to
/// keep the pool warm.
pub struct TradeExecutor {
    next_trade_id: u64,
    trades: Vec<Trade>,
    listener: Option<TradeListener>,
    pool: TradePool,
}

impl TradeExecutor {
    /// Creates an executor with an empty log and a default-capacity pool.
    pub fn new() -> Self {
        Self {
            next_trade_id: 1,
            trades: Vec::new(),
            listener: None,
            pool: TradePool::default(),
        }
    }

    /// Register a listener to be called when a trade is executed.
    ///
    /// At most one listener is held; a later registration replaces it.
    pub fn register_listener(&mut self, listener: TradeListener) {
        self.listener = Some(listener);
    }

    /// Record an execution of `quantity` lots at `price` between the two
    /// orders, appending to the log and notifying the listener.
    ///
    /// The caller has already applied the fill to both orders; this method
    /// only constructs the record (pool-first) and publishes it.
    pub fn execute(&mut self, buy: &Order, sell: &Order, price: u128, quantity: u64) {
        debug_assert!(quantity > 0);

        let mut trade = self.pool.get().unwrap_or_default();
        trade.id = self.next_trade_id;
        trade.buy_order_id = buy.id;
        trade.sell_order_id = sell.id;
        trade.price = price;
        trade.quantity = quantity;
        trade.timestamp = buy.timestamp.max(sell.timestamp);
        let symbol = buy.symbol.as_deref().or(sell.symbol.as_deref());
        match (&mut trade.symbol, symbol) {
            (Some(slot), Some(sym)) => {
                slot.clear();
                slot.push_str(sym);
            }
            (slot, sym) => *slot = sym.map(str::to_string),
        }
        self.next_trade_id += 1;

        trace!(
            "Executed trade {}: buy={} sell={} price={} qty={}",
            trade.id, trade.buy_order_id, trade.sell_order_id, price, quantity
        );

        self.trades.push(trade);
        if let (Some(listener), Some(trade)) = (&self.listener, self.trades.last()) {
            listener(trade);
        }
    }

    /// Returns and clears the accumulated trade log.
    pub fn drain_trades(&mut self) -> Vec<Trade> {
        std::mem::take(&mut self.trades)
    }

    /// Returns copies of recent trades, optionally filtered by symbol and
    /// limited to the most recent `limit`.
    pub fn trades(&self, symbol: Option<&str>, limit: usize) -> Vec<Trade> {
        match symbol {
            None => {
                let start = self.trades.len().saturating_sub(limit);
                self.trades[start..].to_vec()
            }
            Some(symbol) => {
                let filtered: Vec<&Trade> = self
                    .trades
                    .iter()
                    .filter(|t| t.symbol.as_deref() == Some(symbol))
                    .collect();
                let start = filtered.len().saturating_sub(limit);
                filtered[start..].iter().map(|t| (*t).clone()).collect()
            }
        }
    }

    /// Number of trades currently in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// True when the log holds no trades.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Hand previously drained trades back to the recycling pool.
    ///
    /// Only as many as the pool has space for are kept; the rest drop.
    pub fn recycle_trades(&mut self, drained: Vec<Trade>) {
        let space = self.pool.space_left();
        for trade in drained.into_iter().take(space) {
            self.pool.put(trade);
        }
    }

    /// Move up to `count` of the most recent logged trades into the pool,
    /// removing them from the log.
    pub fn recycle_recent(&mut self, count: usize) {
        let n = count.min(self.trades.len()).min(self.pool.space_left());
        for _ in 0..n {
            if let Some(trade) = self.trades.pop() {
                self.pool.put(trade);
            }
        }
    }

    /// Number of recycled trade records currently pooled.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }
}

impl Default for TradeExecutor {
    fn default() -> Self {
        Self::new()
    }
}
