//! Market snapshot: the opaque external input to the engines.

use std::collections::BTreeMap;

use super::Curve;
use crate::types::CurrencyPair;

/// A point-in-time snapshot of the market data the engines price against.
///
/// Holds OIS zero curves per currency, FX spot levels per pair code,
/// floating index fixings, and a flat credit/liquidity spread. The core
/// never fetches or refreshes a snapshot; whoever calls the engines owns
/// retrieval and passes the snapshot in as a value.
///
/// # Examples
///
/// ```
/// use treasury_core::market::{Curve, MarketSnapshot};
///
/// let snapshot = MarketSnapshot::new()
///     .with_curve("USD", Curve::from_pillars(&[(0.25, 0.052), (1.0, 0.050)]).unwrap())
///     .with_fx_spot("EUR/USD", 1.0850)
///     .with_float_index("SOFR_3M", 0.052);
///
/// assert_eq!(snapshot.fx_spot_code("EUR/USD"), Some(1.0850));
/// // Reciprocal fallback when only the inverse pair is quoted.
/// assert!((snapshot.fx_spot_code("USD/EUR").unwrap() - 1.0 / 1.0850).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize)]
pub struct MarketSnapshot {
    ois_curves: BTreeMap<String, Curve>,
    fx_spots: BTreeMap<String, f64>,
    float_indices: BTreeMap<String, f64>,
    credit_spread: f64,
}

impl MarketSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an OIS curve for a currency code.
    pub fn with_curve(mut self, currency: impl Into<String>, curve: Curve) -> Self {
        self.ois_curves.insert(currency.into(), curve);
        self
    }

    /// Adds an FX spot level for a pair code such as "EUR/USD".
    pub fn with_fx_spot(mut self, pair: impl Into<String>, spot: f64) -> Self {
        self.fx_spots.insert(pair.into(), spot);
        self
    }

    /// Adds a floating index fixing, e.g. "SOFR_3M".
    pub fn with_float_index(mut self, index: impl Into<String>, rate: f64) -> Self {
        self.float_indices.insert(index.into(), rate);
        self
    }

    /// Sets the flat credit/liquidity spread (decimal).
    pub fn with_credit_spread(mut self, spread: f64) -> Self {
        self.credit_spread = spread;
        self
    }

    /// OIS rate for a currency at a tenor, interpolated on its curve.
    ///
    /// Returns `None` when the snapshot carries no curve for the currency;
    /// the engine turns that into a typed computation error.
    pub fn ois_rate(&self, currency: &str, tenor_years: f64) -> Option<f64> {
        self.ois_curves.get(currency).map(|c| c.rate_at(tenor_years))
    }

    /// FX spot for a validated pair, falling back to the reciprocal of the
    /// inverted pair when only that side is quoted.
    pub fn fx_spot(&self, pair: &CurrencyPair) -> Option<f64> {
        let direct = self.fx_spots.get(&pair.code()).copied();
        if direct.is_some() {
            return direct;
        }
        let inverted = pair.inverted_code()?;
        let rate = self.fx_spots.get(&inverted).copied()?;
        if rate == 0.0 {
            return None;
        }
        Some(1.0 / rate)
    }

    /// FX spot by raw pair code, with the same reciprocal fallback.
    pub fn fx_spot_code(&self, pair_code: &str) -> Option<f64> {
        let direct = self.fx_spots.get(pair_code).copied();
        if direct.is_some() {
            return direct;
        }
        let (base, quote) = pair_code.split_once('/')?;
        let rate = self.fx_spots.get(&format!("{}/{}", quote, base)).copied()?;
        if rate == 0.0 {
            return None;
        }
        Some(1.0 / rate)
    }

    /// Floating index fixing by name.
    pub fn float_index(&self, index: &str) -> Option<f64> {
        self.float_indices.get(index).copied()
    }

    /// The flat credit/liquidity spread (decimal).
    pub fn credit_spread(&self) -> f64 {
        self.credit_spread
    }

    /// Curves by currency code, in code order.
    pub fn curves(&self) -> &BTreeMap<String, Curve> {
        &self.ois_curves
    }

    /// FX spots by pair code, in code order.
    pub fn fx_spots(&self) -> &BTreeMap<String, f64> {
        &self.fx_spots
    }

    /// Floating index fixings by name, in name order.
    pub fn float_indices(&self) -> &BTreeMap<String, f64> {
        &self.float_indices
    }
}
