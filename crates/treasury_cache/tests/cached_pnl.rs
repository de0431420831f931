//! End-to-end flow: deal set -> fingerprint -> cached PnL computation.

use std::time::Duration;

use treasury_cache::{fingerprint, ttl, ResultCache};
use treasury_core::config::CalcConfig;
use treasury_core::deal::{Deal, DealBuilder, DealKind, DealSet};
use treasury_core::market::{Curve, MarketSnapshot};
use treasury_core::types::Date;
use treasury_pnl::{compute_pnl, ComputationError, PnlResult};

fn deal(id: &str, notional: f64) -> Deal {
    DealBuilder::new()
        .id(id)
        .label("cached pnl test")
        .kind(DealKind::Deposit)
        .pair("USD")
        .notional(notional)
        .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
        .value_date(Date::from_ymd(2025, 8, 3).unwrap())
        .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
        .fixed_rate(0.045)
        .contract_rate(0.044)
        .build()
        .unwrap()
}

fn snapshot() -> MarketSnapshot {
    MarketSnapshot::new().with_curve(
        "USD",
        Curve::from_pillars(&[(0.25, 0.052), (1.0, 0.050), (5.0, 0.043)]).unwrap(),
    )
}

fn config() -> CalcConfig {
    CalcConfig::new(Date::from_ymd(2025, 9, 1).unwrap())
}

#[test]
fn cached_computation_is_idempotent() {
    let deals = DealSet::new(vec![deal("A", -10e6), deal("B", 5e6)]).unwrap();
    let snapshot = snapshot();
    let config = config();
    let cache: ResultCache<PnlResult> = ResultCache::in_memory();
    let key = fingerprint(&deals, &config, &snapshot).unwrap();

    let (first, hit) = cache
        .get_or_compute(&key, ttl::PNL, || compute_pnl(&deals, &snapshot, &config))
        .unwrap();
    assert!(!hit);

    let (second, hit) = cache
        .get_or_compute(&key, ttl::PNL, || compute_pnl(&deals, &snapshot, &config))
        .unwrap();
    assert!(hit);
    assert_eq!(first, second);

    let stats = cache.stats();
    assert_eq!(stats.miss_count, 1);
    assert_eq!(stats.hit_count, 1);
    assert_eq!(stats.entries, 1);
}

#[test]
fn changed_input_changes_key_and_recomputes() {
    let base = DealSet::new(vec![deal("A", -10e6)]).unwrap();
    let edited = DealSet::new(vec![deal("A", -12e6)]).unwrap();
    let snapshot = snapshot();
    let config = config();
    let cache: ResultCache<PnlResult> = ResultCache::in_memory();

    let base_key = fingerprint(&base, &config, &snapshot).unwrap();
    let edited_key = fingerprint(&edited, &config, &snapshot).unwrap();
    assert_ne!(base_key, edited_key);

    cache
        .get_or_compute(&base_key, ttl::PNL, || compute_pnl(&base, &snapshot, &config))
        .unwrap();
    let (_, hit) = cache
        .get_or_compute(&edited_key, ttl::PNL, || compute_pnl(&edited, &snapshot, &config))
        .unwrap();
    assert!(!hit);
    assert_eq!(cache.stats().entries, 2);
}

#[test]
fn reordered_portfolio_reuses_the_entry() {
    let forward = DealSet::new(vec![deal("A", -10e6), deal("B", 5e6)]).unwrap();
    let reversed = DealSet::new(vec![deal("B", 5e6), deal("A", -10e6)]).unwrap();
    let snapshot = snapshot();
    let config = config();
    let cache: ResultCache<PnlResult> = ResultCache::in_memory();

    let key_forward = fingerprint(&forward, &config, &snapshot).unwrap();
    let key_reversed = fingerprint(&reversed, &config, &snapshot).unwrap();
    assert_eq!(key_forward, key_reversed);

    cache
        .get_or_compute(&key_forward, ttl::PNL, || compute_pnl(&forward, &snapshot, &config))
        .unwrap();
    let (_, hit) = cache
        .get_or_compute(&key_reversed, ttl::PNL, || {
            compute_pnl(&reversed, &snapshot, &config)
        })
        .unwrap();
    assert!(hit);
}

#[test]
fn engine_errors_pass_through_the_cache() {
    let deals = DealSet::new(vec![deal("A", -10e6)]).unwrap();
    let empty_snapshot = MarketSnapshot::new();
    let config = config();
    let cache: ResultCache<PnlResult> = ResultCache::in_memory();
    let key = fingerprint(&deals, &config, &empty_snapshot).unwrap();

    let result = cache.get_or_compute(&key, Duration::from_secs(60), || {
        compute_pnl(&deals, &empty_snapshot, &config)
    });
    assert!(matches!(result, Err(ComputationError::MissingCurve { .. })));
    // Nothing was stored for the failed computation.
    assert_eq!(cache.stats().entries, 0);
}
