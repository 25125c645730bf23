//! # Single-Instrument Limit Order Matching Engine
//!
//! A price-time priority limit order matching engine written in Rust, with a
//! pluggable pre-trade risk layer and a lightweight market simulator for load
//! generation and correctness testing.
//!
//! ## Key Features
//!
//! - **Price-Time Priority Matching**: Deterministic matching — best price
//!   first, strict arrival order (FIFO) within a price level. Every trade
//!   executes at the resting (maker) order's price.
//!
//! - **Efficient Book Structure**: Ordered maps give O(log P) access to any
//!   price level and O(log P) best bid/ask; a per-order location index makes
//!   cancellation reach the owning level without scanning the book.
//!
//! - **Object Recycling**: Bounded pools for order and trade records keep
//!   the matching hot path free of allocator traffic. Cancelled orders and
//!   drained trades are reinitialized in place on reuse.
//!
//! - **Pre-Trade Risk Checks**: A separable [`RiskManager`] gates admission
//!   with per-symbol position limits, per-order size caps, a global notional
//!   exposure cap, and price-deviation tolerance against a reference price,
//!   evaluated in a fixed order with short-circuit on the first failure.
//!
//! - **Synchronous Trade Notification**: An optional trade callback fires in
//!   the producing thread of control, after each execution and before the
//!   matcher's next step.
//!
//! - **Checksummed Snapshots**: Point-in-time book snapshots with serde JSON
//!   round-trips and SHA-256 integrity validation.
//!
//! ## Scheduling Model
//!
//! The engine is single-threaded on its hot path: every public operation
//! completes synchronously, and operations on one engine observe a total
//! order equal to call order. A multi-instrument deployment composes one
//! engine per instrument, each owned by one worker, with a producer
//! dispatching by symbol.
//!
//! ## Example
//!
//! ```
//! use matchbook_rs::prelude::*;
//!
//! let mut engine = MatchingEngine::new("BTCUSD");
//!
//! // Rest a bid, then cross it with a smaller ask
//! let bid = engine.submit_limit(Side::Buy, 50_000, 10, None, None).unwrap();
//! engine.submit_limit(Side::Sell, 50_000, 4, None, None).unwrap();
//!
//! let trades = engine.drain_trades();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].price, 50_000);
//! assert_eq!(trades[0].quantity, 4);
//!
//! // Six lots still rest at the bid; cancellation is idempotent
//! assert_eq!(engine.levels(Side::Buy), vec![(50_000, 6)]);
//! assert!(engine.cancel(bid));
//! assert!(!engine.cancel(bid));
//! ```

pub mod engine;
mod error;
pub mod prelude;
pub mod risk;
pub mod sim;
mod utils;

pub use engine::{
    BookSnapshot, LevelSnapshot, MatchingEngine, Matcher, Order, OrderBook, OrderId,
    OrderProcessor, OrderStatus, OrderType, PriceLevel, SNAPSHOT_FORMAT_VERSION, Side,
    SnapshotPackage, Trade, TradeExecutor, TradeListener,
};
pub use error::EngineError;
pub use risk::{RiskCheckResult, RiskLimits, RiskManager};
pub use sim::{MarketSimulator, SimulationStats, SimulatorConfig};
pub use utils::current_time_millis;
