//! The PnL computation itself.

use rayon::prelude::*;

use treasury_core::config::CalcConfig;
use treasury_core::deal::{Deal, DealSet};
use treasury_core::market::MarketSnapshot;
use treasury_core::types::DayCount;

use crate::error::ComputationError;
use crate::result::{PnlResult, PnlRow, PnlWarning};

/// Duration approximation applied to the MtM rate move.
const MTM_DURATION_FACTOR: f64 = 0.8;

/// Calibrated sensitivity of the rate component.
const RATE_SENSITIVITY: f64 = 0.5;

/// Base liquidity spread (10bp) before the snapshot credit spread.
const BASE_LIQUIDITY_SPREAD: f64 = 0.001;

/// Notional at which the liquidity size factor saturates.
const LIQUIDITY_SIZE_NORMALIZER: f64 = 100_000_000.0;

/// Deal count above which rows are priced on the rayon pool.
const PARALLEL_THRESHOLD: usize = 256;

/// Computes the per-deal, per-component PnL table.
///
/// Pure function of its three inputs: no ambient valuation date, no market
/// access, no caching. Rows come back in portfolio order whether the set
/// was priced serially or on the thread pool.
///
/// # Errors
///
/// - [`ComputationError::MissingCurve`] when a deal's base currency has no
///   OIS curve and no override is configured,
/// - [`ComputationError::MissingFxSpot`] when a spot/forward deal's pair is
///   quoted neither directly nor inverted.
///
/// Matured deals are not errors: they produce an all-zero row.
pub fn compute_pnl(
    deals: &DealSet,
    snapshot: &MarketSnapshot,
    config: &CalcConfig,
) -> Result<PnlResult, ComputationError> {
    let started = std::time::Instant::now();

    let rows: Result<Vec<PnlRow>, ComputationError> = if deals.len() >= PARALLEL_THRESHOLD {
        deals
            .deals()
            .par_iter()
            .map(|deal| price_deal(deal, snapshot, config))
            .collect()
    } else {
        deals
            .iter()
            .map(|deal| price_deal(deal, snapshot, config))
            .collect()
    };
    let result = PnlResult::from_rows(rows?);

    tracing::info!(
        deals = deals.len(),
        warnings = result.warning_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pnl computation complete"
    );
    Ok(result)
}

/// Prices a single deal into a table row.
fn price_deal(
    deal: &Deal,
    snapshot: &MarketSnapshot,
    config: &CalcConfig,
) -> Result<PnlRow, ComputationError> {
    let val_date = config.valuation_date();
    let pair_code = deal.pair().code();

    // Matured deals contribute an all-zero row rather than an error.
    if deal.maturity_date() <= val_date {
        return Ok(zero_row(deal, pair_code));
    }

    let ttm = DayCount::Act365.year_fraction(val_date, deal.maturity_date());

    let ois_rate_now = match config.ois_rate_override() {
        Some(rate) => rate,
        None => snapshot
            .ois_rate(deal.pair().base().code(), ttm)
            .ok_or_else(|| ComputationError::MissingCurve {
                currency: deal.pair().base().code().to_string(),
                deal_id: deal.id().as_str().to_string(),
            })?,
    };

    let mut warnings = Vec::new();

    let accrued = if config.calc_accrued() {
        let year_frac = deal.day_count().year_fraction(deal.value_date(), val_date);
        if year_frac > 0.0 {
            let client_rate = resolve_client_rate(deal, snapshot, ois_rate_now, &mut warnings);
            (client_rate - deal.contract_rate()) * deal.notional() * year_frac
        } else {
            0.0
        }
    } else {
        0.0
    };

    let mtm = if config.calc_mtm() {
        let rate_move = ois_rate_now - deal.contract_rate();
        let mut mtm = -rate_move * deal.notional() * MTM_DURATION_FACTOR * ttm;
        if let (true, Some(anchor)) = (deal.kind().is_fx(), deal.traded_spot()) {
            let spot_now = snapshot.fx_spot(&deal.pair()).ok_or_else(|| {
                ComputationError::MissingFxSpot {
                    pair: pair_code.clone(),
                    deal_id: deal.id().as_str().to_string(),
                }
            })?;
            mtm += deal.notional() * (spot_now - anchor) / anchor;
        }
        mtm
    } else {
        0.0
    };

    let rate = if config.calc_rate() {
        (ois_rate_now - deal.contract_rate()) * deal.notional() * ttm * RATE_SENSITIVITY
    } else {
        0.0
    };

    let liquidity = if config.calc_liquidity() {
        let size_factor = (deal.notional().abs() / LIQUIDITY_SIZE_NORMALIZER).min(1.0);
        let maturity_factor = ttm.min(1.0);
        let spread = size_factor * maturity_factor * (BASE_LIQUIDITY_SPREAD + snapshot.credit_spread());
        -spread * deal.notional()
    } else {
        0.0
    };

    Ok(PnlRow {
        deal_id: deal.id().clone(),
        pair: pair_code,
        kind: deal.kind(),
        notional: deal.notional(),
        time_to_maturity: ttm,
        ois_rate_used: ois_rate_now,
        accrued,
        mtm,
        rate,
        liquidity,
        total: accrued + mtm + rate + liquidity,
        warnings,
    })
}

/// Resolves the client rate of a deal, substituting the current OIS rate
/// for floating deals with no fixing. The substitution is flagged on the
/// row, never silent.
fn resolve_client_rate(
    deal: &Deal,
    snapshot: &MarketSnapshot,
    ois_rate_now: f64,
    warnings: &mut Vec<PnlWarning>,
) -> f64 {
    if let Some(rate) = deal.fixed_rate() {
        return rate;
    }
    if let Some(fixing) = deal.floating_index().and_then(|ix| snapshot.float_index(ix)) {
        return fixing;
    }
    tracing::warn!(
        deal_id = deal.id().as_str(),
        index = deal.floating_index(),
        "no floating fixing at valuation time, substituting snapshot OIS rate"
    );
    warnings.push(PnlWarning::FloatingRateSubstituted {
        index: deal.floating_index().map(str::to_string),
        substituted_rate: ois_rate_now,
    });
    ois_rate_now
}

fn zero_row(deal: &Deal, pair_code: String) -> PnlRow {
    PnlRow {
        deal_id: deal.id().clone(),
        pair: pair_code,
        kind: deal.kind(),
        notional: deal.notional(),
        time_to_maturity: 0.0,
        ois_rate_used: 0.0,
        accrued: 0.0,
        mtm: 0.0,
        rate: 0.0,
        liquidity: 0.0,
        total: 0.0,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use treasury_core::deal::{DealBuilder, DealKind};
    use treasury_core::market::Curve;
    use treasury_core::types::Date;

    fn val_date() -> Date {
        Date::from_ymd(2025, 9, 1).unwrap()
    }

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::new()
            .with_curve(
                "USD",
                Curve::from_pillars(&[(0.25, 0.052), (1.0, 0.050), (5.0, 0.043)]).unwrap(),
            )
            .with_curve(
                "EUR",
                Curve::from_pillars(&[(0.25, 0.036), (1.0, 0.033), (5.0, 0.028)]).unwrap(),
            )
            .with_fx_spot("EUR/USD", 1.0850)
            .with_float_index("SOFR_3M", 0.052)
    }

    fn deposit(id: &str) -> Deal {
        DealBuilder::new()
            .id(id)
            .label("USD deposit")
            .kind(DealKind::Deposit)
            .pair("USD")
            .notional(-10_000_000.0)
            .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
            .value_date(Date::from_ymd(2025, 8, 3).unwrap())
            .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
            .fixed_rate(0.045)
            .contract_rate(0.044)
            .build()
            .unwrap()
    }

    fn forward(id: &str) -> Deal {
        DealBuilder::new()
            .id(id)
            .label("EUR/USD forward")
            .kind(DealKind::Forward)
            .pair("EUR/USD")
            .notional(25_000_000.0)
            .trade_date(Date::from_ymd(2025, 7, 1).unwrap())
            .value_date(Date::from_ymd(2025, 7, 3).unwrap())
            .maturity_date(Date::from_ymd(2026, 1, 5).unwrap())
            .fixed_rate(0.034)
            .contract_rate(0.033)
            .traded_spot(1.0700)
            .build()
            .unwrap()
    }

    #[test]
    fn test_row_count_matches_deal_count() {
        let deals = DealSet::new(vec![deposit("A"), forward("B")]).unwrap();
        let result = compute_pnl(&deals, &snapshot(), &CalcConfig::new(val_date())).unwrap();
        assert_eq!(result.len(), deals.len());
        assert_eq!(result.rows()[0].deal_id.as_str(), "A");
        assert_eq!(result.rows()[1].deal_id.as_str(), "B");
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let deals = DealSet::new(vec![deposit("A"), forward("B")]).unwrap();
        let result = compute_pnl(&deals, &snapshot(), &CalcConfig::new(val_date())).unwrap();
        for row in result.rows() {
            assert_relative_eq!(
                row.total,
                row.accrued + row.mtm + row.rate + row.liquidity,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_disabled_components_are_exact_zero() {
        let deals = DealSet::new(vec![deposit("A")]).unwrap();
        let config = CalcConfig::new(val_date())
            .with_mtm(false)
            .with_rate(false)
            .with_liquidity(false);
        let result = compute_pnl(&deals, &snapshot(), &config).unwrap();
        let row = &result.rows()[0];
        assert_eq!(row.mtm, 0.0);
        assert_eq!(row.rate, 0.0);
        assert_eq!(row.liquidity, 0.0);
        assert_ne!(row.accrued, 0.0);
        assert_eq!(row.total, row.accrued);
    }

    #[test]
    fn test_accrued_value() {
        // 29 days of accrual at a +10bp spread on -10M: ACT/365.
        let deals = DealSet::new(vec![deposit("A")]).unwrap();
        let config = CalcConfig::new(val_date())
            .with_mtm(false)
            .with_rate(false)
            .with_liquidity(false);
        let result = compute_pnl(&deals, &snapshot(), &config).unwrap();
        let expected = (0.045 - 0.044) * -10_000_000.0 * 29.0 / 365.0;
        assert_relative_eq!(result.rows()[0].accrued, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_accrued_zero_before_value_date() {
        let deals = DealSet::new(vec![deposit("A")]).unwrap();
        let early = CalcConfig::new(Date::from_ymd(2025, 8, 2).unwrap());
        let result = compute_pnl(&deals, &snapshot(), &early).unwrap();
        assert_eq!(result.rows()[0].accrued, 0.0);
    }

    #[test]
    fn test_matured_deal_yields_zero_row() {
        let deals = DealSet::new(vec![deposit("A")]).unwrap();
        let late = CalcConfig::new(Date::from_ymd(2026, 1, 1).unwrap());
        let result = compute_pnl(&deals, &snapshot(), &late).unwrap();
        let row = &result.rows()[0];
        assert_eq!(row.total, 0.0);
        assert_eq!(row.time_to_maturity, 0.0);
        assert_eq!(row.ois_rate_used, 0.0);
    }

    #[test]
    fn test_missing_curve_is_typed_error() {
        let deals = DealSet::new(vec![deposit("A")]).unwrap();
        let empty = MarketSnapshot::new();
        let result = compute_pnl(&deals, &empty, &CalcConfig::new(val_date()));
        assert!(matches!(
            result,
            Err(ComputationError::MissingCurve { currency, .. }) if currency == "USD"
        ));
    }

    #[test]
    fn test_override_replaces_missing_curve() {
        let deals = DealSet::new(vec![deposit("A")]).unwrap();
        let empty = MarketSnapshot::new();
        let config = CalcConfig::new(val_date()).with_ois_override(0.05).unwrap();
        let result = compute_pnl(&deals, &empty, &config).unwrap();
        assert_eq!(result.rows()[0].ois_rate_used, 0.05);
    }

    #[test]
    fn test_missing_fx_spot_is_typed_error() {
        let deals = DealSet::new(vec![forward("B")]).unwrap();
        let no_fx = MarketSnapshot::new().with_curve(
            "EUR",
            Curve::from_pillars(&[(1.0, 0.033)]).unwrap(),
        );
        let result = compute_pnl(&deals, &no_fx, &CalcConfig::new(val_date()));
        assert!(matches!(
            result,
            Err(ComputationError::MissingFxSpot { pair, .. }) if pair == "EUR/USD"
        ));
    }

    #[test]
    fn test_fx_revaluation_in_mtm() {
        let deals = DealSet::new(vec![forward("B")]).unwrap();
        let config = CalcConfig::new(val_date())
            .with_accrued(false)
            .with_rate(false)
            .with_liquidity(false);
        let with_move = compute_pnl(&deals, &snapshot(), &config).unwrap();
        // Spot moved 1.0700 -> 1.0850; the FX leg of MtM alone is
        // notional * (1.0850 - 1.0700) / 1.0700.
        let fx_leg = 25_000_000.0 * (1.0850 - 1.0700) / 1.0700;
        let rate_now = snapshot().ois_rate("EUR", with_move.rows()[0].time_to_maturity).unwrap();
        let rate_leg = -(rate_now - 0.033) * 25_000_000.0 * 0.8 * with_move.rows()[0].time_to_maturity;
        assert_relative_eq!(with_move.rows()[0].mtm, fx_leg + rate_leg, epsilon = 1e-6);
    }

    #[test]
    fn test_floating_substitution_flagged() {
        let floating = DealBuilder::new()
            .id("F1")
            .label("floating deposit")
            .kind(DealKind::Deposit)
            .pair("USD")
            .notional(-10_000_000.0)
            .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
            .value_date(Date::from_ymd(2025, 8, 3).unwrap())
            .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
            .floating_index("EURIBOR_3M") // not in the snapshot
            .contract_rate(0.044)
            .build()
            .unwrap();
        let deals = DealSet::new(vec![floating]).unwrap();
        let result = compute_pnl(&deals, &snapshot(), &CalcConfig::new(val_date())).unwrap();
        let row = &result.rows()[0];
        assert!(row.has_warnings());
        assert!(matches!(
            row.warnings[0],
            PnlWarning::FloatingRateSubstituted { ref index, .. } if index.as_deref() == Some("EURIBOR_3M")
        ));
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_floating_with_fixing_not_flagged() {
        let floating = DealBuilder::new()
            .id("F2")
            .label("floating deposit")
            .kind(DealKind::Deposit)
            .pair("USD")
            .notional(-10_000_000.0)
            .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
            .value_date(Date::from_ymd(2025, 8, 3).unwrap())
            .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
            .floating_index("SOFR_3M")
            .contract_rate(0.044)
            .build()
            .unwrap();
        let deals = DealSet::new(vec![floating]).unwrap();
        let result = compute_pnl(&deals, &snapshot(), &CalcConfig::new(val_date())).unwrap();
        assert!(!result.rows()[0].has_warnings());
    }

    #[test]
    fn test_deterministic_across_repeats() {
        let deals = DealSet::new(vec![deposit("A"), forward("B")]).unwrap();
        let config = CalcConfig::new(val_date());
        let first = compute_pnl(&deals, &snapshot(), &config).unwrap();
        let second = compute_pnl(&deals, &snapshot(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_path_preserves_order() {
        let mut deals = Vec::new();
        for i in 0..(PARALLEL_THRESHOLD + 10) {
            deals.push(
                DealBuilder::new()
                    .id(format!("D{:04}", i))
                    .label("bulk deposit")
                    .kind(DealKind::Deposit)
                    .pair("USD")
                    .notional(1_000_000.0 + i as f64)
                    .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
                    .value_date(Date::from_ymd(2025, 8, 3).unwrap())
                    .maturity_date(Date::from_ymd(2025, 12, 3).unwrap())
                    .fixed_rate(0.045)
                    .contract_rate(0.044)
                    .build()
                    .unwrap(),
            );
        }
        let set = DealSet::new(deals).unwrap();
        let result = compute_pnl(&set, &snapshot(), &CalcConfig::new(val_date())).unwrap();
        assert_eq!(result.len(), PARALLEL_THRESHOLD + 10);
        for (i, row) in result.rows().iter().enumerate() {
            assert_eq!(row.deal_id.as_str(), format!("D{:04}", i));
        }
    }

    #[test]
    fn test_liquidity_scales_with_tenor() {
        let short = deposit("S");
        let long = DealBuilder::new()
            .id("L")
            .label("2Y USD deposit")
            .kind(DealKind::Deposit)
            .pair("USD")
            .notional(-10_000_000.0)
            .trade_date(Date::from_ymd(2025, 8, 1).unwrap())
            .value_date(Date::from_ymd(2025, 8, 3).unwrap())
            .maturity_date(Date::from_ymd(2027, 8, 3).unwrap())
            .fixed_rate(0.045)
            .contract_rate(0.044)
            .build()
            .unwrap();
        let deals = DealSet::new(vec![short, long]).unwrap();
        let result = compute_pnl(&deals, &snapshot(), &CalcConfig::new(val_date())).unwrap();
        // Shorter tenor => smaller liquidity magnitude.
        assert!(result.rows()[0].liquidity.abs() < result.rows()[1].liquidity.abs());
    }
}
