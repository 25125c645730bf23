//! Engine error types.

use crate::risk::RiskCheckResult;
use thiserror::Error;

/// Errors surfaced at the engine boundary.
///
/// Rejections carry no side effects: a failed submission leaves the order
/// book, the trade log, and the risk state unchanged. Cancellation of an
/// unknown order is a normal negative result (`false` / `None`), not an
/// error. Invariant violations inside the matching loop indicate bugs and
/// are handled with debug assertions rather than recoverable errors.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Order quantity must be positive.
    #[error("invalid quantity: {quantity} (must be positive)")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: u64,
    },

    /// Order price must be positive.
    #[error("invalid price: {price} (must be positive)")]
    InvalidPrice {
        /// The rejected price
        price: u128,
    },

    /// The order failed a pre-trade risk check.
    #[error("risk check failed: {reason}")]
    RiskRejected {
        /// The first failing check kind
        reason: RiskCheckResult,
    },

    /// Error while serializing snapshot data.
    #[error("serialization error: {message}")]
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing snapshot data.
    #[error("deserialization error: {message}")]
    DeserializationError {
        /// Underlying error message
        message: String,
    },

    /// Snapshot integrity check failed.
    #[error("checksum mismatch: expected {expected}, but computed {actual}")]
    ChecksumMismatch {
        /// Expected checksum value
        expected: String,
        /// Actual checksum value
        actual: String,
    },
}
