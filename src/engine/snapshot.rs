//! Order book snapshots for market data.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

/// One price level in a snapshot: aggregate view, no per-order detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Price of the level in ticks
    pub price: u128,
    /// Aggregate remaining quantity at this level
    pub quantity: u64,
    /// Number of orders resting at this level
    pub order_count: usize,
}

/// A snapshot of the order book state at a specific point in time.
///
/// Bids are listed highest price first, asks lowest first, matching the
/// book's iteration priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// The symbol or identifier for this order book
    pub symbol: String,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Snapshot of bid price levels
    pub bids: Vec<LevelSnapshot>,

    /// Snapshot of ask price levels
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    /// Get the best bid price and quantity.
    #[must_use]
    pub fn best_bid(&self) -> Option<(u128, u64)> {
        let bid = self
            .bids
            .iter()
            .map(|level| (level.price, level.quantity))
            .max_by_key(|&(price, _)| price);
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the best ask price and quantity.
    #[must_use]
    pub fn best_ask(&self) -> Option<(u128, u64)> {
        let ask = self
            .asks
            .iter()
            .map(|level| (level.price, level.quantity))
            .min_by_key(|&(price, _)| price);
        trace!("best_ask: {:?}", ask);
        ask
    }

    /// Get the mid price (average of best bid and best ask).
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid).
    #[must_use]
    pub fn spread(&self) -> Option<u128> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Total quantity on the bid side.
    #[must_use]
    pub fn total_bid_volume(&self) -> u64 {
        self.bids.iter().map(|level| level.quantity).sum()
    }

    /// Total quantity on the ask side.
    #[must_use]
    pub fn total_ask_volume(&self) -> u64 {
        self.asks.iter().map(|level| level.quantity).sum()
    }
}

/// Format version used for checksum-enabled book snapshots.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for [`BookSnapshot`] instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPackage {
    /// Version of the snapshot schema for forward compatibility.
    pub version: u32,
    /// Snapshot payload.
    pub snapshot: BookSnapshot,
    /// Hex-encoded checksum of the serialized snapshot.
    pub checksum: String,
}

impl SnapshotPackage {
    /// Creates a new package computing the checksum of the snapshot contents.
    pub fn new(snapshot: BookSnapshot) -> Result<Self, EngineError> {
        let checksum = Self::compute_checksum(&snapshot)?;

        Ok(Self {
            version: SNAPSHOT_FORMAT_VERSION,
            snapshot,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self).map_err(|error| EngineError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, EngineError> {
        serde_json::from_str(data).map_err(|error| EngineError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the checksum and version.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.version != SNAPSHOT_FORMAT_VERSION {
            return Err(EngineError::DeserializationError {
                message: format!(
                    "unsupported snapshot version: {} (expected {})",
                    self.version, SNAPSHOT_FORMAT_VERSION
                ),
            });
        }

        let computed = Self::compute_checksum(&self.snapshot)?;
        if computed != self.checksum {
            return Err(EngineError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated snapshot.
    pub fn into_snapshot(self) -> Result<BookSnapshot, EngineError> {
        self.validate()?;
        Ok(self.snapshot)
    }

    fn compute_checksum(snapshot: &BookSnapshot) -> Result<String, EngineError> {
        let payload =
            serde_json::to_vec(snapshot).map_err(|error| EngineError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        let checksum_bytes = hasher.finalize();
        Ok(checksum_bytes.as_slice().iter().fold(String::new(), |mut acc, byte| {
            acc.push_str(&format!("{:02x}", byte));
            acc
        }))
    }
}
