//! Load-generation market simulator.
//!
//! A single-threaded cooperative driver that submits randomized limit and
//! market orders through the engine's public operations, paced by timers as
//! a Poisson process. An optional [`RiskManager`] gates every submission;
//! rejected orders are counted and never reach the engine. Useful for
//! exercising the engine under sustained flow in tests and benchmarks.

use crate::engine::{MatchingEngine, OrderId, OrderType, Side};
use crate::error::EngineError;
use crate::risk::RiskManager;
use crate::utils::current_time_millis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// Simulator configuration.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Instrument tag stamped on every generated order
    pub symbol: String,
    /// Starting reference price in ticks
    pub initial_price: u128,
    /// Minimum price increment; generated prices are rounded to it
    pub tick_size: u128,
    /// Average orders per second (Poisson arrival rate)
    pub order_rate: f64,
    /// Per-step fractional price volatility of the random walk
    pub volatility: f64,
    /// Fraction of generated orders that are market orders
    pub market_order_pct: f64,
    /// Smallest generated order size, in lots
    pub min_order_size: u64,
    /// Largest generated order size, in lots
    pub max_order_size: u64,
    /// Seed for the random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSD".to_string(),
            initial_price: 50_000,
            tick_size: 1,
            order_rate: 100.0,
            volatility: 0.002,
            market_order_pct: 0.1,
            min_order_size: 1,
            max_order_size: 100,
            seed: None,
        }
    }
}

/// Counters accumulated over a simulation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationStats {
    /// Orders accepted by the engine
    pub orders_submitted: u64,
    /// Orders rejected by the risk gate
    pub orders_rejected: u64,
}

/// Drives a [`MatchingEngine`] with randomized order flow.
pub struct MarketSimulator {
    engine: MatchingEngine,
    risk: Option<RiskManager>,
    config: SimulatorConfig,
    current_price: u128,
    rng: StdRng,
    stats: SimulationStats,
}

impl MarketSimulator {
    /// Create a simulator over the given engine.
    ///
    /// When a risk manager is supplied, its reference price for the
    /// simulated symbol is seeded from the configured initial price.
    pub fn new(engine: MatchingEngine, risk: Option<RiskManager>, config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(current_time_millis()),
        };
        let mut risk = risk;
        if let Some(risk) = risk.as_mut() {
            risk.update_reference_price(&config.symbol, config.initial_price);
        }
        let current_price = config.initial_price;
        Self {
            engine,
            risk,
            config,
            current_price,
            rng,
            stats: SimulationStats::default(),
        }
    }

    /// Run for the given wall-clock duration, pacing submissions as a
    /// Poisson process at the configured order rate.
    pub async fn run(&mut self, duration: Duration) {
        info!(
            "Starting simulation for {:?} at {} orders/s",
            duration, self.config.order_rate
        );
        let deadline = Instant::now() + duration;

        while Instant::now() < deadline {
            let delay = self.next_delay();
            sleep(delay).await;
            self.step();
        }

        info!(
            "Simulation finished: {} submitted, {} rejected, {} trades",
            self.stats.orders_submitted,
            self.stats.orders_rejected,
            self.engine.trades(None, usize::MAX).len()
        );
    }

    /// Run exactly `steps` submissions back to back, without pacing.
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Generate and submit one order.
    pub fn step(&mut self) {
        self.update_price();
        match self.place_order() {
            Ok(order_id) => {
                self.stats.orders_submitted += 1;
                debug!("Submitted order {}", order_id);
            }
            Err(error) => {
                self.stats.orders_rejected += 1;
                debug!("Order rejected: {}", error);
            }
        }
    }

    /// Accumulated statistics for this run.
    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// The current simulated reference price.
    #[must_use]
    pub fn current_price(&self) -> u128 {
        self.current_price
    }

    /// Shared access to the driven engine.
    #[must_use]
    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Mutable access to the driven engine, e.g. to drain trades.
    pub fn engine_mut(&mut self) -> &mut MatchingEngine {
        &mut self.engine
    }

    /// Tear down the simulator, handing back the engine.
    #[must_use]
    pub fn into_engine(self) -> MatchingEngine {
        self.engine
    }

    fn place_order(&mut self) -> Result<OrderId, EngineError> {
        let is_market = self.rng.gen_bool(self.config.market_order_pct);
        let is_buy = self.rng.gen_bool(0.5);
        let side = if is_buy { Side::Buy } else { Side::Sell };
        let quantity = self
            .rng
            .gen_range(self.config.min_order_size..=self.config.max_order_size);

        let (order_type, price) = if is_market {
            (OrderType::Market, None)
        } else {
            (OrderType::Limit, Some(self.limit_price_for(side)))
        };

        if let Some(risk) = &self.risk {
            let signed_size = if is_buy { quantity as i64 } else { -(quantity as i64) };
            let check_price = price.unwrap_or(self.current_price);
            let result = risk.check_order(&self.config.symbol, signed_size, check_price, !is_market);
            if !result.is_passed() {
                return Err(EngineError::RiskRejected { reason: result });
            }
        }

        let timestamp = Some(current_time_millis());
        match order_type {
            OrderType::Market => {
                self.engine
                    .submit_market(side, quantity, timestamp, Some(&self.config.symbol))
            }
            OrderType::Limit => self.engine.submit_limit(
                side,
                price.unwrap_or(self.current_price),
                quantity,
                timestamp,
                Some(&self.config.symbol),
            ),
        }
    }

    /// Limit prices cluster around the reference: buys at or below it,
    /// sells at or above, offset by up to 1%.
    fn limit_price_for(&mut self, side: Side) -> u128 {
        let offset_fraction: f64 = self.rng.gen_range(0.0..0.01);
        let offset = (self.current_price as f64 * offset_fraction) as u128;
        let raw = match side {
            Side::Buy => self.current_price.saturating_sub(offset),
            Side::Sell => self.current_price.saturating_add(offset),
        };
        self.round_to_tick(raw)
    }

    /// Random-walk price update, rounded to the tick size and floored at
    /// one tick. The risk manager's reference price follows.
    fn update_price(&mut self) {
        let shock: f64 = self.rng.gen_range(-1.0..1.0);
        let change = self.current_price as f64 * self.config.volatility * shock;
        let updated = (self.current_price as f64 + change).max(self.config.tick_size as f64);
        self.current_price = self.round_to_tick(updated as u128);

        if let Some(risk) = self.risk.as_mut() {
            risk.update_reference_price(&self.config.symbol, self.current_price);
        }
    }

    fn round_to_tick(&self, price: u128) -> u128 {
        let tick = self.config.tick_size.max(1);
        let rounded = (price / tick) * tick;
        rounded.max(tick)
    }

    fn next_delay(&mut self) -> Duration {
        // Exponential inter-arrival times: -ln(U) / rate
        let u: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let seconds = -u.ln() / self.config.order_rate.max(f64::EPSILON);
        Duration::from_secs_f64(seconds)
    }
}
