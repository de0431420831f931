//! Stress scenarios: shocked-snapshot repricing.
//!
//! A scenario is a plain shift triple (FX relative, rate absolute, credit
//! absolute). The five named scenarios are constructors returning the same
//! type as any custom triple: data, not special-cased code paths.

use treasury_core::config::CalcConfig;
use treasury_core::deal::{DealId, DealKind, DealSet};
use treasury_core::market::MarketSnapshot;
use treasury_pnl::{compute_pnl, ComputationError};

/// A named shift triple applied to a market snapshot.
///
/// `fx_shift` is relative (-0.15 = spots down 15%); `rate_shift` and
/// `credit_shift` are absolute decimals (0.02 = +200bp).
///
/// # Examples
///
/// ```
/// use treasury_risk::StressScenario;
///
/// let crisis = StressScenario::systemic_crisis();
/// assert_eq!((crisis.fx_shift, crisis.rate_shift, crisis.credit_shift), (-0.15, 0.02, 0.02));
///
/// // A custom triple is the same kind of value.
/// let custom = StressScenario::new("Desk scenario", -0.02, 0.005, 0.001);
/// assert_eq!(custom.name, "Desk scenario");
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StressScenario {
    /// Display name of the scenario.
    pub name: String,
    /// Relative FX spot shift (decimal).
    pub fx_shift: f64,
    /// Absolute rate shift (decimal), applied to every curve pillar and
    /// float index.
    pub rate_shift: f64,
    /// Absolute credit spread shift (decimal).
    pub credit_shift: f64,
}

impl StressScenario {
    /// Creates a custom scenario.
    pub fn new(name: impl Into<String>, fx_shift: f64, rate_shift: f64, credit_shift: f64) -> Self {
        Self {
            name: name.into(),
            fx_shift,
            rate_shift,
            credit_shift,
        }
    }

    /// Broad risk-off: FX -15%, rates +200bp, credit +200bp.
    pub fn systemic_crisis() -> Self {
        Self::new("Systemic Crisis", -0.15, 0.02, 0.02)
    }

    /// Central-bank tightening: FX -5%, rates +150bp, credit +50bp.
    pub fn rate_tightening() -> Self {
        Self::new("Rate Tightening", -0.05, 0.015, 0.005)
    }

    /// Emerging-market stress: FX -8%, rates +50bp, credit +150bp.
    pub fn emerging_market_crisis() -> Self {
        Self::new("Emerging Market Crisis", -0.08, 0.005, 0.015)
    }

    /// Volatility spike: FX -12%, rates +100bp, credit +100bp.
    pub fn extreme_volatility() -> Self {
        Self::new("Extreme Volatility", -0.12, 0.01, 0.01)
    }

    /// Funding-currency rally: FX -6%, rates -100bp, credit +25bp.
    pub fn carry_trade_unwind() -> Self {
        Self::new("Carry Trade Unwind", -0.06, -0.01, 0.0025)
    }

    /// The five predefined scenarios.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::systemic_crisis(),
            Self::rate_tightening(),
            Self::emerging_market_crisis(),
            Self::extreme_volatility(),
            Self::carry_trade_unwind(),
        ]
    }
}

/// Applies a scenario's shifts to a snapshot, producing the shocked copy.
///
/// Every curve pillar and float index moves by the rate shift, every FX
/// spot by the relative FX shift, and the credit spread by the credit
/// shift. The input snapshot is untouched.
pub fn shock_snapshot(snapshot: &MarketSnapshot, scenario: &StressScenario) -> MarketSnapshot {
    let mut shocked = MarketSnapshot::new()
        .with_credit_spread(snapshot.credit_spread() + scenario.credit_shift);
    for (currency, curve) in snapshot.curves() {
        shocked = shocked.with_curve(currency.clone(), curve.shifted(scenario.rate_shift));
    }
    for (pair, spot) in snapshot.fx_spots() {
        shocked = shocked.with_fx_spot(pair.clone(), spot * (1.0 + scenario.fx_shift));
    }
    for (index, rate) in snapshot.float_indices() {
        shocked = shocked.with_float_index(index.clone(), rate + scenario.rate_shift);
    }
    shocked
}

/// Per-deal PnL delta between the shocked and unshocked runs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DealDelta {
    /// Deal identifier.
    pub deal_id: DealId,
    /// Currency pair code of the deal.
    pub pair: String,
    /// Deal kind.
    pub kind: DealKind,
    /// Accrued delta.
    pub accrued: f64,
    /// Mark-to-market delta.
    pub mtm: f64,
    /// Rate delta.
    pub rate: f64,
    /// Liquidity delta.
    pub liquidity: f64,
    /// Total delta for the deal.
    pub total: f64,
}

/// Result of applying one scenario to a portfolio.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioImpact {
    /// The scenario that was applied.
    pub scenario: StressScenario,
    /// Per-deal deltas, in portfolio order.
    pub rows: Vec<DealDelta>,
}

impl ScenarioImpact {
    /// Portfolio-level total delta.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Looks a delta row up by deal identifier.
    pub fn get(&self, deal_id: &DealId) -> Option<&DealDelta> {
        self.rows.iter().find(|r| &r.deal_id == deal_id)
    }

    /// The row with the largest loss, if any row lost.
    pub fn worst(&self) -> Option<&DealDelta> {
        self.rows
            .iter()
            .filter(|r| r.total < 0.0)
            .min_by(|a, b| a.total.total_cmp(&b.total))
    }
}

/// Reprices the portfolio under a shocked snapshot and returns the delta
/// against the unshocked result.
///
/// Pure composition over the PnL engine: two engine runs, one subtraction
/// per row. A zero-shift scenario therefore yields a delta of exactly zero
/// for every deal.
///
/// # Errors
///
/// Propagates [`ComputationError`] from either engine run.
pub fn apply_scenario(
    deals: &DealSet,
    snapshot: &MarketSnapshot,
    config: &CalcConfig,
    scenario: &StressScenario,
) -> Result<ScenarioImpact, ComputationError> {
    let base = compute_pnl(deals, snapshot, config)?;
    let shocked = compute_pnl(deals, &shock_snapshot(snapshot, scenario), config)?;

    let rows = base
        .rows()
        .iter()
        .zip(shocked.rows())
        .map(|(before, after)| DealDelta {
            deal_id: before.deal_id.clone(),
            pair: before.pair.clone(),
            kind: before.kind,
            accrued: after.accrued - before.accrued,
            mtm: after.mtm - before.mtm,
            rate: after.rate - before.rate,
            liquidity: after.liquidity - before.liquidity,
            total: after.total - before.total,
        })
        .collect();

    tracing::debug!(scenario = %scenario.name, deals = deals.len(), "scenario applied");
    Ok(ScenarioImpact {
        scenario: scenario.clone(),
        rows,
    })
}
