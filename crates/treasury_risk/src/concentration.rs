//! Concentration: fraction of gross notional per bucket.

use std::collections::BTreeMap;

use treasury_core::deal::DealSet;
use treasury_core::types::{Date, DayCount};

/// Dimension to bucket the portfolio by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketBy {
    /// Currency pair code ("EUR/USD", "USD").
    Pair,
    /// Base currency code.
    BaseCurrency,
    /// Remaining-tenor bucket as of the given valuation date.
    Tenor(Date),
    /// Trader identifier; deals without one fall under "Unknown".
    Trader,
}

/// Classifies a remaining tenor in years into a standard bucket.
///
/// Non-positive tenors classify as "Expired"; beyond ten years the bucket
/// is the rounded-down year count ("12Y").
pub fn tenor_bucket(years: f64) -> String {
    if !years.is_finite() || years <= 0.0 {
        return "Expired".to_string();
    }
    if years <= 1.0 / 12.0 {
        "1M".to_string()
    } else if years <= 0.25 {
        "3M".to_string()
    } else if years <= 0.5 {
        "6M".to_string()
    } else if years <= 1.0 {
        "12M".to_string()
    } else if years <= 2.0 {
        "2Y".to_string()
    } else if years <= 5.0 {
        "5Y".to_string()
    } else if years <= 10.0 {
        "10Y".to_string()
    } else {
        format!("{}Y", years as i64)
    }
}

/// Fraction of total absolute notional per bucket.
///
/// Fractions sum to 1.0 (within floating-point tolerance) for any
/// non-empty deal set; an empty set yields an empty mapping.
///
/// # Examples
///
/// ```
/// use treasury_core::deal::DealSet;
/// use treasury_risk::{concentration, BucketBy};
///
/// let empty = concentration(&DealSet::empty(), BucketBy::Pair);
/// assert!(empty.is_empty());
/// ```
pub fn concentration(deals: &DealSet, bucket_by: BucketBy) -> BTreeMap<String, f64> {
    let gross = deals.gross_notional();
    if deals.is_empty() || gross <= 0.0 {
        return BTreeMap::new();
    }

    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for deal in deals {
        let key = match bucket_by {
            BucketBy::Pair => deal.pair().code(),
            BucketBy::BaseCurrency => deal.pair().base().code().to_string(),
            BucketBy::Tenor(val_date) => {
                let ttm = if deal.maturity_date() <= val_date {
                    0.0
                } else {
                    DayCount::Act365.year_fraction(val_date, deal.maturity_date())
                };
                tenor_bucket(ttm)
            }
            BucketBy::Trader => deal.trader().unwrap_or("Unknown").to_string(),
        };
        *buckets.entry(key).or_insert(0.0) += deal.notional().abs();
    }

    for value in buckets.values_mut() {
        *value /= gross;
    }
    buckets
}
