//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the matchbook-rs crate. Instead of importing each type
//! individually, you can use:
//!
//! ```rust
//! use matchbook_rs::prelude::*;
//! ```

// Engine types
pub use crate::engine::{MatchingEngine, Matcher, OrderBook, OrderProcessor, TradeExecutor};

// Order types and enums
pub use crate::engine::{Order, OrderId, OrderStatus, OrderType, Side};

// Trade types
pub use crate::engine::{Trade, TradeListener};

// Snapshot types
pub use crate::engine::{BookSnapshot, LevelSnapshot, SnapshotPackage};

// Error type
pub use crate::error::EngineError;

// Risk types
pub use crate::risk::{RiskCheckResult, RiskLimits, RiskManager};

// Simulator types
pub use crate::sim::{MarketSimulator, SimulationStats, SimulatorConfig};

// Utility functions
pub use crate::utils::current_time_millis;
