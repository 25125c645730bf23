//! Driving the engine with the load-generation simulator.

use matchbook_rs::{MarketSimulator, MatchingEngine, RiskLimits, RiskManager, SimulatorConfig};
use std::time::Duration;

fn config() -> SimulatorConfig {
    SimulatorConfig {
        symbol: "BTCUSD".to_string(),
        initial_price: 50_000,
        tick_size: 10,
        market_order_pct: 0.15,
        min_order_size: 1,
        max_order_size: 20,
        seed: Some(1234),
        ..SimulatorConfig::default()
    }
}

#[test]
fn test_sustained_flow_preserves_invariants() {
    let mut sim = MarketSimulator::new(MatchingEngine::new("BTCUSD"), None, config());
    sim.run_steps(2_000);

    assert_eq!(sim.stats().orders_submitted, 2_000);

    let engine = sim.engine_mut();
    let snapshot = engine.snapshot();
    for level in snapshot.bids.iter().chain(snapshot.asks.iter()) {
        assert!(level.quantity > 0);
        assert!(level.order_count > 0);
        // Prices respect the configured tick size
        assert_eq!(level.price % 10, 0);
    }
    if let (Some((bid, _)), Some((ask, _))) = (snapshot.best_bid(), snapshot.best_ask()) {
        assert!(bid < ask);
    }

    // Trade log is ordered
    let trades = engine.drain_trades();
    for pair in trades.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }
}

#[test]
fn test_generated_orders_carry_the_symbol() {
    let mut sim = MarketSimulator::new(MatchingEngine::new("BTCUSD"), None, config());
    sim.run_steps(500);

    let trades = sim.engine_mut().drain_trades();
    assert!(!trades.is_empty(), "seeded run should cross at least once");
    assert!(trades.iter().all(|t| t.symbol.as_deref() == Some("BTCUSD")));
}

#[test]
fn test_risk_gated_flow_respects_exposure_cap() {
    let mut limits = RiskLimits::new();
    // Below the notional of the larger generated orders (~50k price, up to
    // 20 lots), so the gate engages on a sustained run
    limits.max_exposure = Some(500_000);
    let risk = RiskManager::new(limits);

    let mut sim = MarketSimulator::new(MatchingEngine::new("BTCUSD"), Some(risk), config());
    sim.run_steps(1_000);

    let stats = sim.stats();
    assert_eq!(stats.orders_submitted + stats.orders_rejected, 1_000);
    assert!(stats.orders_rejected > 0);
    assert!(stats.orders_submitted > 0);
}

#[tokio::test]
async fn test_timed_run_submits_and_stops() {
    let cfg = SimulatorConfig {
        order_rate: 1_000.0,
        ..config()
    };
    let mut sim = MarketSimulator::new(MatchingEngine::new("BTCUSD"), None, cfg);
    sim.run(Duration::from_millis(150)).await;

    let stats = sim.stats();
    assert!(stats.orders_submitted > 0);

    // The engine is handed back intact
    let mut engine = sim.into_engine();
    assert_eq!(engine.symbol(), "BTCUSD");
    let _ = engine.snapshot();
}

#[test]
fn test_resting_depth_accumulates() {
    let mut sim = MarketSimulator::new(MatchingEngine::new("BTCUSD"), None, config());
    sim.run_steps(300);
    // Limit-heavy flow leaves resting depth behind
    assert!(sim.engine().open_orders() > 0);
    assert!(sim.engine().best_bid().is_some() || sim.engine().best_ask().is_some());
}
