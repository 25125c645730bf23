//! Snapshot construction, serialization, and integrity validation.

use matchbook_rs::{EngineError, MatchingEngine, Side, SnapshotPackage};

fn populated_engine() -> MatchingEngine {
    let mut engine = MatchingEngine::new("BTCUSD");
    engine.submit_limit(Side::Buy, 100, 10, Some(1_000), None).unwrap();
    engine.submit_limit(Side::Buy, 99, 20, Some(1_001), None).unwrap();
    engine.submit_limit(Side::Buy, 99, 5, Some(1_002), None).unwrap();
    engine.submit_limit(Side::Sell, 101, 15, Some(1_003), None).unwrap();
    engine.submit_limit(Side::Sell, 102, 25, Some(1_004), None).unwrap();
    engine
}

#[test]
fn test_snapshot_reflects_book() {
    let mut engine = populated_engine();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.symbol, "BTCUSD");
    assert_eq!(snapshot.bids.len(), 2);
    assert_eq!(snapshot.asks.len(), 2);

    // Priority order: bids descending, asks ascending
    assert_eq!(snapshot.bids[0].price, 100);
    assert_eq!(snapshot.bids[0].quantity, 10);
    assert_eq!(snapshot.bids[0].order_count, 1);
    assert_eq!(snapshot.bids[1].price, 99);
    assert_eq!(snapshot.bids[1].quantity, 25);
    assert_eq!(snapshot.bids[1].order_count, 2);
    assert_eq!(snapshot.asks[0].price, 101);
    assert_eq!(snapshot.asks[1].price, 102);
}

#[test]
fn test_snapshot_metrics() {
    let mut engine = populated_engine();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.best_bid(), Some((100, 10)));
    assert_eq!(snapshot.best_ask(), Some((101, 15)));
    assert_eq!(snapshot.spread(), Some(1));
    assert_eq!(snapshot.mid_price(), Some(100.5));
    assert_eq!(snapshot.total_bid_volume(), 35);
    assert_eq!(snapshot.total_ask_volume(), 40);
}

#[test]
fn test_snapshot_depth_truncation() {
    let mut engine = populated_engine();
    let snapshot = engine.snapshot_with_depth(1);
    assert_eq!(snapshot.bids.len(), 1);
    assert_eq!(snapshot.asks.len(), 1);
    assert_eq!(snapshot.bids[0].price, 100);
    assert_eq!(snapshot.asks[0].price, 101);
}

#[test]
fn test_snapshot_aggregates_refresh_after_cancel() {
    let mut engine = MatchingEngine::new("BTCUSD");
    engine.submit_limit(Side::Buy, 100, 10, None, None).unwrap();
    let id = engine.submit_limit(Side::Buy, 100, 20, None, None).unwrap();
    engine.cancel(id);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.bids.len(), 1);
    assert_eq!(snapshot.bids[0].quantity, 10);
    assert_eq!(snapshot.bids[0].order_count, 1);
}

#[test]
fn test_package_roundtrip() {
    let mut engine = populated_engine();
    let snapshot = engine.snapshot();

    let package = SnapshotPackage::new(snapshot.clone()).unwrap();
    let json = package.to_json().unwrap();
    let restored = SnapshotPackage::from_json(&json).unwrap();

    assert!(restored.validate().is_ok());
    assert_eq!(restored.into_snapshot().unwrap(), snapshot);
}

#[test]
fn test_package_detects_tampering() {
    let mut engine = populated_engine();
    let mut package = SnapshotPackage::new(engine.snapshot()).unwrap();
    package.snapshot.asks[0].price = 1;

    match package.validate() {
        Err(EngineError::ChecksumMismatch { expected, actual }) => {
            assert_ne!(expected, actual);
        }
        other => panic!("expected ChecksumMismatch, got {other:?}"),
    }
}

#[test]
fn test_package_rejects_unknown_version() {
    let mut engine = populated_engine();
    let mut package = SnapshotPackage::new(engine.snapshot()).unwrap();
    package.version = 99;

    assert!(matches!(
        package.validate(),
        Err(EngineError::DeserializationError { .. })
    ));
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(matches!(
        SnapshotPackage::from_json("{not json"),
        Err(EngineError::DeserializationError { .. })
    ));
}
