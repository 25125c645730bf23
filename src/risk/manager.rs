//! The pre-trade risk gate: position, order-size, exposure, and price
//! tolerance checks, evaluated in a fixed order with short-circuit on the
//! first failure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

/// Outcome of a pre-trade check run: `Passed`, or the first failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCheckResult {
    /// Every configured check passed
    Passed,
    /// The resulting position would exceed the per-symbol cap
    FailedPositionLimit,
    /// The order size exceeds the per-symbol cap
    FailedOrderSize,
    /// The order's notional would push aggregate exposure over the cap
    FailedExposure,
    /// The order price deviates too far from the reference price
    FailedPriceTolerance,
}

impl RiskCheckResult {
    /// True when the order may proceed to the matching engine.
    #[inline]
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, RiskCheckResult::Passed)
    }
}

impl fmt::Display for RiskCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskCheckResult::Passed => write!(f, "passed"),
            RiskCheckResult::FailedPositionLimit => write!(f, "position limit exceeded"),
            RiskCheckResult::FailedOrderSize => write!(f, "order size limit exceeded"),
            RiskCheckResult::FailedExposure => write!(f, "exposure limit exceeded"),
            RiskCheckResult::FailedPriceTolerance => write!(f, "price tolerance exceeded"),
        }
    }
}

/// Risk limit configuration, supplied by the embedding application.
///
/// A limit that is not configured for a symbol simply skips the
/// corresponding check.
#[derive(Debug, Clone, Default)]
pub struct RiskLimits {
    /// Maximum absolute position per symbol, in lots
    pub max_position: HashMap<String, u64>,
    /// Maximum absolute order size per symbol, in lots
    pub max_order_size: HashMap<String, u64>,
    /// Maximum aggregate notional exposure across all symbols
    pub max_exposure: Option<u128>,
    /// Maximum fractional deviation from the reference price (0.1 = 10%)
    pub price_tolerance: f64,
}

impl RiskLimits {
    /// Limits with the default 10% price tolerance and nothing else
    /// configured.
    pub fn new() -> Self {
        Self {
            price_tolerance: 0.1,
            ..Self::default()
        }
    }
}

/// Pre-trade admission control.
///
/// Owns the risk state: per-symbol positions (signed, long positive),
/// aggregate notional exposure, and the reference price table. Checks never
/// mutate state; positions and exposure move only when a fill is
/// acknowledged through [`RiskManager::update_after_fill`].
#[derive(Debug, Clone)]
pub struct RiskManager {
    limits: RiskLimits,
    positions: HashMap<String, i64>,
    current_exposure: u128,
    reference_prices: HashMap<String, u128>,
}

impl RiskManager {
    /// Create a manager with the given limits and empty state.
    pub fn new(limits: RiskLimits) -> Self {
        Self {
            limits,
            positions: HashMap::new(),
            current_exposure: 0,
            reference_prices: HashMap::new(),
        }
    }

    /// Set the current position for a symbol, in lots (signed).
    pub fn set_position(&mut self, symbol: &str, size: i64) {
        self.positions.insert(symbol.to_string(), size);
    }

    /// The current position for a symbol (zero when untracked).
    #[must_use]
    pub fn position(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    /// The current aggregate notional exposure.
    #[must_use]
    pub fn current_exposure(&self) -> u128 {
        self.current_exposure
    }

    /// Set or replace the reference price for a symbol.
    pub fn update_reference_price(&mut self, symbol: &str, price: u128) {
        self.reference_prices.insert(symbol.to_string(), price);
    }

    /// The reference price for a symbol, if one is known.
    #[must_use]
    pub fn reference_price(&self, symbol: &str) -> Option<u128> {
        self.reference_prices.get(symbol).copied()
    }

    /// Mutable access to the limits, for runtime reconfiguration.
    pub fn limits_mut(&mut self) -> &mut RiskLimits {
        &mut self.limits
    }

    /// Run the full check sequence for an order, returning the first
    /// failing check kind or `Passed`.
    ///
    /// `order_size` is signed: positive for buys, negative for sells.
    /// `check_price_tolerance` is false for market orders, which have no
    /// price to check.
    pub fn check_order(
        &self,
        symbol: &str,
        order_size: i64,
        price: u128,
        check_price_tolerance: bool,
    ) -> RiskCheckResult {
        if !self.check_position_limit(symbol, order_size) {
            return RiskCheckResult::FailedPositionLimit;
        }
        if !self.check_order_size(symbol, order_size) {
            return RiskCheckResult::FailedOrderSize;
        }
        if !self.check_exposure(symbol, order_size, price) {
            return RiskCheckResult::FailedExposure;
        }
        if check_price_tolerance && !self.check_price_tolerance(symbol, price) {
            return RiskCheckResult::FailedPriceTolerance;
        }
        RiskCheckResult::Passed
    }

    /// Apply an acknowledged fill: position moves by the signed quantity,
    /// exposure grows by the fill notional.
    pub fn update_after_fill(&mut self, symbol: &str, filled_size: i64, fill_price: u128) {
        let position = self.positions.entry(symbol.to_string()).or_insert(0);
        *position += filled_size;
        self.current_exposure = self
            .current_exposure
            .saturating_add(Self::notional(filled_size, fill_price));

        info!(
            "Position and exposure updated: symbol={}, position={}, exposure={}",
            symbol, position, self.current_exposure
        );
    }

    fn check_position_limit(&self, symbol: &str, order_size: i64) -> bool {
        let Some(&max_position) = self.limits.max_position.get(symbol) else {
            return true;
        };

        let current = self.position(symbol);
        let new_position = current + order_size;
        if new_position.unsigned_abs() > max_position {
            warn!(
                "Position limit exceeded for {}: current={}, order={}, new={}, limit={}",
                symbol, current, order_size, new_position, max_position
            );
            return false;
        }
        true
    }

    fn check_order_size(&self, symbol: &str, order_size: i64) -> bool {
        let Some(&max_order) = self.limits.max_order_size.get(symbol) else {
            return true;
        };

        if order_size.unsigned_abs() > max_order {
            warn!(
                "Order size limit exceeded for {}: order={}, limit={}",
                symbol, order_size, max_order
            );
            return false;
        }
        true
    }

    fn check_exposure(&self, symbol: &str, order_size: i64, price: u128) -> bool {
        let Some(max_exposure) = self.limits.max_exposure else {
            return true;
        };

        let order_exposure = Self::notional(order_size, price);
        let new_exposure = self.current_exposure.saturating_add(order_exposure);
        if new_exposure > max_exposure {
            warn!(
                "Exposure limit exceeded for {}: current={}, order={}, new={}, limit={}",
                symbol, self.current_exposure, order_exposure, new_exposure, max_exposure
            );
            return false;
        }
        true
    }

    fn check_price_tolerance(&self, symbol: &str, price: u128) -> bool {
        let Some(&reference) = self.reference_prices.get(symbol) else {
            return true;
        };
        if reference == 0 {
            return true;
        }

        let deviation = price.abs_diff(reference) as f64 / reference as f64;
        if deviation > self.limits.price_tolerance {
            warn!(
                "Price tolerance exceeded for {}: order_price={}, reference={}, deviation={:.4}, tolerance={:.4}",
                symbol, price, reference, deviation, self.limits.price_tolerance
            );
            return false;
        }
        true
    }

    #[inline]
    fn notional(size: i64, price: u128) -> u128 {
        size.unsigned_abs() as u128 * price
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskLimits::new())
    }
}
