//! Order types and enums shared across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique order identifier, assigned monotonically by the order processor.
pub type OrderId = u64;

/// The side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side (bids)
    Buy,
    /// Sell side (asks)
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The kind of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Carries a limit price; trades only at prices not worse than it,
    /// rests otherwise.
    Limit,
    /// No price; trades against resting orders until exhausted or the
    /// opposite side is empty, then is discarded.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, no fills yet
    New,
    /// Some quantity filled, some remaining
    PartiallyFilled,
    /// Fully filled
    Filled,
    /// Removed by an explicit cancel
    Cancelled,
    /// Rejected at admission
    Rejected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// An order, either resting in the book or in flight through the matcher.
///
/// Quantities maintain `filled_quantity + remaining_quantity == quantity` at
/// all times. Prices are integer ticks, quantities integer lots, so fill
/// accounting is exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique monotonic identifier
    pub id: OrderId,
    /// Buy or Sell
    pub side: Side,
    /// Limit or Market
    pub order_type: OrderType,
    /// Limit price in ticks; `None` for market orders
    pub price: Option<u128>,
    /// Original quantity in lots
    pub quantity: u64,
    /// Quantity filled so far
    pub filled_quantity: u64,
    /// Quantity still open
    pub remaining_quantity: u64,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Submission timestamp, milliseconds since epoch
    pub timestamp: u64,
    /// Optional instrument tag
    pub symbol: Option<String>,
}

impl Order {
    /// Create a new order with no fills.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Option<u128>,
        quantity: u64,
        timestamp: u64,
        symbol: Option<String>,
    ) -> Self {
        Self {
            id,
            side,
            order_type,
            price,
            quantity,
            filled_quantity: 0,
            remaining_quantity: quantity,
            status: OrderStatus::New,
            timestamp,
            symbol,
        }
    }

    /// Reinitialize a recycled order in place, avoiding a fresh allocation
    /// for the symbol when the recycled one can be reused.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn reset(
        &mut self,
        id: OrderId,
        side: Side,
        order_type: OrderType,
        price: Option<u128>,
        quantity: u64,
        timestamp: u64,
        symbol: Option<&str>,
    ) {
        self.id = id;
        self.side = side;
        self.order_type = order_type;
        self.price = price;
        self.quantity = quantity;
        self.filled_quantity = 0;
        self.remaining_quantity = quantity;
        self.status = OrderStatus::New;
        self.timestamp = timestamp;
        match (&mut self.symbol, symbol) {
            (Some(existing), Some(new)) => {
                existing.clear();
                existing.push_str(new);
            }
            (slot, new) => *slot = new.map(str::to_string),
        }
    }

    /// Apply a fill of `quantity` lots and update the status.
    ///
    /// `quantity` must not exceed `remaining_quantity`.
    #[inline]
    pub(crate) fn apply_fill(&mut self, quantity: u64) {
        debug_assert!(quantity <= self.remaining_quantity);
        self.filled_quantity += quantity;
        self.remaining_quantity -= quantity;
        self.status = if self.remaining_quantity == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// True while the order may still rest or trade.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.status, OrderStatus::New | OrderStatus::PartiallyFilled)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order(id={}, side={}, type={}, price={:?}, qty={}, filled={}, remaining={}, status={})",
            self.id,
            self.side,
            self.order_type,
            self.price,
            self.quantity,
            self.filled_quantity,
            self.remaining_quantity,
            self.status
        )
    }
}
