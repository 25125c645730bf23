//! Risk gate scenarios: the fixed check ordering and state updates.

use matchbook_rs::{RiskCheckResult, RiskLimits, RiskManager};

/// max_position BTC=10, max_order BTC=5, max_exposure=200000,
/// tolerance=0.1, reference=50000.
fn risk() -> RiskManager {
    let mut limits = RiskLimits::new();
    limits.max_position.insert("BTC".to_string(), 10);
    limits.max_order_size.insert("BTC".to_string(), 5);
    limits.max_exposure = Some(200_000);
    limits.price_tolerance = 0.10;

    let mut risk = RiskManager::new(limits);
    risk.update_reference_price("BTC", 50_000);
    risk
}

#[test]
fn test_position_limit_rejection() {
    let mut risk = risk();
    risk.set_position("BTC", 8);
    assert_eq!(
        risk.check_order("BTC", 4, 50_000, true),
        RiskCheckResult::FailedPositionLimit
    );
}

#[test]
fn test_order_size_rejection() {
    let mut risk = risk();
    risk.set_position("BTC", 0);
    assert_eq!(
        risk.check_order("BTC", 6, 50_000, true),
        RiskCheckResult::FailedOrderSize
    );
}

#[test]
fn test_exposure_rejection() {
    let mut risk = risk();
    risk.set_position("BTC", 0);
    // 5 * 50000 = 250000 > 200000
    assert_eq!(
        risk.check_order("BTC", 5, 50_000, true),
        RiskCheckResult::FailedExposure
    );
}

#[test]
fn test_price_tolerance_rejection_and_pass() {
    let risk = risk();
    // 15% off the 50000 reference with a 10% tolerance
    assert_eq!(
        risk.check_order("BTC", 1, 57_500, true),
        RiskCheckResult::FailedPriceTolerance
    );
    // 5% off passes
    assert_eq!(risk.check_order("BTC", 1, 52_500, true), RiskCheckResult::Passed);
}

#[test]
fn test_check_ordering_position_before_order_size() {
    // An order violating both position and order-size limits reports the
    // position failure: the checks short-circuit in a fixed sequence.
    let mut risk = risk();
    risk.set_position("BTC", 8);
    let violates_both = risk.check_order("BTC", 6, 50_000, true);
    assert_eq!(violates_both, RiskCheckResult::FailedPositionLimit);
}

#[test]
fn test_sell_orders_use_signed_sizes() {
    let mut risk = risk();
    risk.set_position("BTC", 10);
    // Selling reduces the position, so a sell passes where a buy would not
    assert_eq!(risk.check_order("BTC", -2, 50_000, false), RiskCheckResult::Passed);
    assert_eq!(
        risk.check_order("BTC", 1, 50_000, false),
        RiskCheckResult::FailedPositionLimit
    );
}

#[test]
fn test_fills_accumulate_exposure_until_cap() {
    let mut risk = risk();
    assert_eq!(risk.check_order("BTC", 2, 50_000, true), RiskCheckResult::Passed);
    risk.update_after_fill("BTC", 2, 50_000);
    assert_eq!(risk.position("BTC"), 2);
    assert_eq!(risk.current_exposure(), 100_000);

    // Another 100000 of notional would land exactly on the cap: allowed
    assert_eq!(risk.check_order("BTC", 2, 50_000, true), RiskCheckResult::Passed);
    risk.update_after_fill("BTC", 2, 50_000);

    // Any further exposure is over the cap
    assert_eq!(
        risk.check_order("BTC", 1, 50_000, true),
        RiskCheckResult::FailedExposure
    );
}

#[test]
fn test_reference_price_replacement() {
    let mut risk = risk();
    assert_eq!(risk.reference_price("BTC"), Some(50_000));
    risk.update_reference_price("BTC", 60_000);
    assert_eq!(risk.reference_price("BTC"), Some(60_000));
    // 57500 is now within 10% of the new reference
    assert_eq!(risk.check_order("BTC", 1, 57_500, true), RiskCheckResult::Passed);
}

#[test]
fn test_result_display_names() {
    assert_eq!(RiskCheckResult::Passed.to_string(), "passed");
    assert_eq!(
        RiskCheckResult::FailedPositionLimit.to_string(),
        "position limit exceeded"
    );
    assert!(RiskCheckResult::Passed.is_passed());
    assert!(!RiskCheckResult::FailedExposure.is_passed());
}
