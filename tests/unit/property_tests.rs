//! Property tests for the universal engine invariants.

use matchbook_rs::{MatchingEngine, OrderId, Side};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Limit { buy: bool, price: u128, quantity: u64 },
    Market { buy: bool, quantity: u64 },
    Cancel { index: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<bool>(), 90u128..=110u128, 1u64..=20u64)
            .prop_map(|(buy, price, quantity)| Op::Limit { buy, price, quantity }),
        1 => (any::<bool>(), 1u64..=20u64).prop_map(|(buy, quantity)| Op::Market { buy, quantity }),
        2 => (0usize..64usize).prop_map(|index| Op::Cancel { index }),
    ]
}

fn side(buy: bool) -> Side {
    if buy { Side::Buy } else { Side::Sell }
}

/// Asserts the structural invariants that must hold after every operation.
/// Plain asserts: proptest reports the panicking case and shrinks it.
fn assert_book_consistent(engine: &mut MatchingEngine) {
    let bids = engine.levels(Side::Buy);
    let asks = engine.levels(Side::Sell);

    // Priority ordering: bids strictly descending, asks strictly ascending
    for pair in bids.windows(2) {
        assert!(pair[0].0 > pair[1].0, "bids out of order: {bids:?}");
    }
    for pair in asks.windows(2) {
        assert!(pair[0].0 < pair[1].0, "asks out of order: {asks:?}");
    }

    // No reachable level is empty
    let snapshot = engine.snapshot();
    for level in snapshot.bids.iter().chain(snapshot.asks.iter()) {
        assert!(level.quantity > 0, "empty level at {}", level.price);
        assert!(level.order_count > 0, "orderless level at {}", level.price);
    }

    // The book is never locked or crossed after matching completes
    if let (Some((bid, _)), Some((ask, _))) = (snapshot.best_bid(), snapshot.best_ask()) {
        assert!(bid < ask, "book crossed: bid {bid} >= ask {ask}");
    }
}

proptest! {
    #[test]
    fn prop_invariants_hold_under_random_flow(
        ops in prop::collection::vec(op_strategy(), 1..150)
    ) {
        let mut engine = MatchingEngine::new("PROP");
        let mut ids: Vec<OrderId> = Vec::new();

        for op in ops {
            match op {
                Op::Limit { buy, price, quantity } => {
                    let id = engine.submit_limit(side(buy), price, quantity, None, None).unwrap();
                    ids.push(id);
                }
                Op::Market { buy, quantity } => {
                    engine.submit_market(side(buy), quantity, None, None).unwrap();
                }
                Op::Cancel { index } => {
                    if !ids.is_empty() {
                        let id = ids[index % ids.len()];
                        if engine.cancel(id) {
                            // Cancellation is idempotent: a second cancel of
                            // the same id is a negative result
                            prop_assert!(!engine.cancel(id));
                        }
                    }
                }
            }
            assert_book_consistent(&mut engine);
        }

        // The trade log is monotonic in id with non-decreasing timestamps
        let trades = engine.drain_trades();
        for pair in trades.windows(2) {
            prop_assert!(pair[0].id < pair[1].id);
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        for trade in &trades {
            prop_assert!(trade.quantity > 0);
        }
    }

    #[test]
    fn prop_limit_only_flow_conserves_quantity(
        ops in prop::collection::vec(
            (any::<bool>(), 95u128..=105u128, 1u64..=15u64),
            1..120
        )
    ) {
        let mut engine = MatchingEngine::new("PROP");
        let mut submitted: u64 = 0;

        for (buy, price, quantity) in ops {
            engine.submit_limit(side(buy), price, quantity, None, None).unwrap();
            submitted += quantity;
        }

        // Every submitted lot is either resting or was consumed by exactly
        // one trade on each side: submitted = 2 * traded + resting
        let traded: u64 = engine.drain_trades().iter().map(|t| t.quantity).sum();
        let resting: u64 = engine
            .levels(Side::Buy)
            .iter()
            .chain(engine.levels(Side::Sell).iter())
            .map(|(_, quantity)| quantity)
            .sum();
        prop_assert_eq!(submitted, 2 * traded + resting);
    }

    #[test]
    fn prop_fifo_precedence_at_best_price(
        queue_sizes in prop::collection::vec(1u64..=10u64, 2..8),
        taker_extra in 0u64..5u64
    ) {
        let mut engine = MatchingEngine::new("PROP");
        let mut makers: Vec<OrderId> = Vec::new();
        for quantity in &queue_sizes {
            makers.push(engine.submit_limit(Side::Sell, 100, *quantity, None, None).unwrap());
        }

        // Take exactly the first maker's size plus a partial bite of the next
        let take = queue_sizes[0] + taker_extra.min(queue_sizes[1].saturating_sub(1));
        engine.submit_limit(Side::Buy, 100, take, None, None).unwrap();

        let trades = engine.drain_trades();
        prop_assert!(!trades.is_empty());
        // The head of the queue trades first, and trades attribute makers in
        // arrival order
        prop_assert_eq!(trades[0].sell_order_id, makers[0]);
        for (trade, maker) in trades.iter().zip(makers.iter()) {
            prop_assert_eq!(trade.sell_order_id, *maker);
        }
    }
}
