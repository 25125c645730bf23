//! Core order book: price-time priority structure for one instrument.

use super::level::PriceLevel;
use super::order::{Order, OrderId, Side};
use super::snapshot::{BookSnapshot, LevelSnapshot};
use crate::utils::current_time_millis;
use crossbeam::atomic::AtomicCell;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// The two-sided book for a single instrument.
///
/// Price levels live in ordered maps keyed by price: bid priority is
/// descending iteration, ask priority is ascending. `order_locations` maps
/// every resting order id to its `(price, side)` so cancellation reaches the
/// owning level in O(log P); the order itself is owned by exactly one
/// [`PriceLevel`] FIFO. No level is ever left empty — the last removal
/// evicts it.
pub struct OrderBook {
    /// The symbol or identifier for this order book
    pub(super) symbol: String,

    /// Bid side price levels (buy orders); highest price = best bid
    pub(super) bids: BTreeMap<u128, PriceLevel>,

    /// Ask side price levels (sell orders); lowest price = best ask
    pub(super) asks: BTreeMap<u128, PriceLevel>,

    /// Map from order id to (price, side) for O(log P) cancellation
    pub(super) order_locations: DashMap<OrderId, (u128, Side)>,

    /// The last price at which a trade occurred
    pub(super) last_trade_price: AtomicCell<u128>,

    /// Flag indicating if there was a trade
    pub(super) has_traded: AtomicBool,
}

impl OrderBook {
    /// Create a new, empty order book for the given symbol.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_locations: DashMap::new(),
            last_trade_price: AtomicCell::new(0),
            has_traded: AtomicBool::new(false),
        }
    }

    /// Get the symbol of this order book.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Rest a limit order in the book.
    ///
    /// The order must be a limit order with remaining quantity; the matcher
    /// and the admission layer guarantee both.
    pub fn insert(&mut self, order: Order) {
        debug_assert!(order.remaining_quantity > 0);
        let Some(price) = order.price else {
            debug_assert!(false, "market order cannot rest in the book");
            return;
        };
        let side = order.side;

        trace!("Resting order {} {} {} @ {}", order.id, side, order.remaining_quantity, price);

        self.order_locations.insert(order.id, (price, side));
        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        book_side
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add_order(order);
    }

    /// Remove a resting order by id, returning it.
    ///
    /// Returns `None` when the id is unknown or already terminal. The
    /// containing level is evicted if the removal empties it.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let (price, side) = *self.order_locations.get(&order_id)?;

        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = book_side.get_mut(&price)?;
        let removed = level.remove_order(order_id)?;
        if level.is_empty() {
            book_side.remove(&price);
        }
        self.order_locations.remove(&order_id);

        trace!("Removed order {} from {} level {}", order_id, side, price);
        Some(removed)
    }

    /// Get the best bid price, if any.
    ///
    /// O(log P): highest key of the bid map.
    #[must_use]
    pub fn best_bid(&self) -> Option<u128> {
        self.bids.keys().next_back().copied()
    }

    /// Get the best ask price, if any.
    ///
    /// O(log P): lowest key of the ask map.
    #[must_use]
    pub fn best_ask(&self) -> Option<u128> {
        self.asks.keys().next().copied()
    }

    /// Get the mid price (average of best bid and best ask).
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid).
    #[must_use]
    pub fn spread(&self) -> Option<u128> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Get the last trade price, if any trade has occurred.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<u128> {
        if self.has_traded.load(Ordering::Relaxed) {
            Some(self.last_trade_price.load())
        } else {
            None
        }
    }

    /// Look up a resting order by id.
    #[must_use]
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let (price, side) = *self.order_locations.get(&order_id)?;
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side.get(&price)?.get_order(order_id)
    }

    /// True when an order with this id is resting in the book.
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.order_locations.contains_key(&order_id)
    }

    /// Copies of the resting orders at a specific price, in arrival order.
    #[must_use]
    pub fn orders_at_price(&self, price: u128, side: Side) -> Vec<Order> {
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side
            .get(&price)
            .map(|level| level.iter_orders().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of resting orders across both sides.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.order_locations.len()
    }

    /// All price levels of one side as `(price, aggregate quantity)`, in
    /// matching priority order (bids descending, asks ascending).
    ///
    /// Takes `&mut self` because dirty level aggregates are recomputed
    /// lazily on read.
    pub fn levels(&mut self, side: Side) -> Vec<(u128, u64)> {
        match side {
            Side::Buy => self
                .bids
                .iter_mut()
                .rev()
                .map(|(price, level)| (*price, level.total_quantity()))
                .collect(),
            Side::Sell => self
                .asks
                .iter_mut()
                .map(|(price, level)| (*price, level.total_quantity()))
                .collect(),
        }
    }

    /// Build a point-in-time snapshot of the top `depth` levels per side.
    pub fn create_snapshot(&mut self, depth: usize) -> BookSnapshot {
        let bids = self
            .bids
            .iter_mut()
            .rev()
            .take(depth)
            .map(|(price, level)| LevelSnapshot {
                price: *price,
                quantity: level.total_quantity(),
                order_count: level.order_count(),
            })
            .collect();
        let asks = self
            .asks
            .iter_mut()
            .take(depth)
            .map(|(price, level)| LevelSnapshot {
                price: *price,
                quantity: level.total_quantity(),
                order_count: level.order_count(),
            })
            .collect();

        BookSnapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            bids,
            asks,
        }
    }

    /// Asserts the book invariants that must hold between operations:
    /// uncrossed (best bid strictly below best ask) and no empty levels.
    /// Compiled only in debug builds.
    pub(super) fn debug_assert_consistent(&self) {
        #[cfg(debug_assertions)]
        {
            if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
                debug_assert!(bid < ask, "book crossed: bid {bid} >= ask {ask}");
            }
            debug_assert!(self.bids.values().all(|l| !l.is_empty()));
            debug_assert!(self.asks.values().all(|l| !l.is_empty()));
        }
    }
}
