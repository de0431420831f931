//! Deal model: validated, immutable treasury positions.
//!
//! This module provides:
//! - `DealId`: unique deal identifier (generated when absent)
//! - `DealKind`: supported product types
//! - `Deal` / `DealBuilder`: validate-on-construct position record
//! - `DealSet`: ordered portfolio snapshot with unique identifiers
//!
//! A `Deal` cannot exist in an invalid state: the builder rejects the
//! candidate with a [`ValidationError`] instead. Corrections replace the
//! deal object; there is no in-place mutation.

mod set;

pub use set::DealSet;

use std::fmt;

use crate::types::{CurrencyPair, Date, DayCount, ValidationError};

/// Unique identifier of a deal within a deal set.
///
/// Wraps an opaque string; [`DealId::generate`] produces a fresh UUID for
/// deals imported without one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DealId(String);

impl DealId {
    /// Creates an identifier from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DealId {
    fn from(s: &str) -> Self {
        DealId::new(s)
    }
}

/// Supported deal types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DealKind {
    /// FX spot transaction.
    Spot,
    /// FX forward.
    Forward,
    /// One leg of an interest rate swap.
    SwapLeg,
    /// Money-market deposit.
    Deposit,
    /// Money-market loan.
    Loan,
}

impl DealKind {
    /// True for kinds that carry FX revaluation risk.
    #[inline]
    pub fn is_fx(&self) -> bool {
        matches!(self, DealKind::Spot | DealKind::Forward)
    }

    /// Returns the kind name.
    pub fn name(&self) -> &'static str {
        match self {
            DealKind::Spot => "Spot",
            DealKind::Forward => "Forward",
            DealKind::SwapLeg => "SwapLeg",
            DealKind::Deposit => "Deposit",
            DealKind::Loan => "Loan",
        }
    }
}

impl fmt::Display for DealKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An immutable, validated treasury position.
///
/// Constructed through [`DealBuilder`]; all invariants hold for every
/// instance that exists:
/// - notional is finite and non-zero (sign carries direction: positive =
///   lent/asset, negative = borrowed/liability),
/// - dates are ordered trade <= value < maturity,
/// - rates are finite and within [-1, 1],
/// - FX kinds carry a full pair and the spot rate dealt at inception.
///
/// Equality and hashing are structural, so a fingerprint over a deal is a
/// pure function of its field values.
///
/// # Examples
///
/// ```
/// use treasury_core::deal::{DealBuilder, DealKind};
/// use treasury_core::types::Date;
///
/// let deal = DealBuilder::new()
///     .id("FWD001")
///     .label("EUR/USD 6M forward")
///     .kind(DealKind::Forward)
///     .pair("EUR/USD")
///     .notional(25_000_000.0)
///     .trade_date(Date::from_ymd(2025, 7, 1).unwrap())
///     .value_date(Date::from_ymd(2025, 7, 3).unwrap())
///     .maturity_date(Date::from_ymd(2026, 1, 5).unwrap())
///     .contract_rate(0.033)
///     .traded_spot(1.0850)
///     .build()
///     .unwrap();
///
/// assert!(deal.kind().is_fx());
/// assert!(deal.fixed_rate().is_none()); // floating
/// ```
// Serialize only: a deal re-enters the system through the builder, never
// through deserialisation, so no unvalidated instance can exist.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Deal {
    id: DealId,
    label: String,
    kind: DealKind,
    pair: CurrencyPair,
    notional: f64,
    trade_date: Date,
    value_date: Date,
    maturity_date: Date,
    fixed_rate: Option<f64>,
    floating_index: Option<String>,
    contract_rate: f64,
    traded_spot: Option<f64>,
    day_count: DayCount,
    trader: Option<String>,
}

impl Deal {
    /// Returns the deal identifier.
    pub fn id(&self) -> &DealId {
        &self.id
    }

    /// Returns the free-text label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the deal kind.
    pub fn kind(&self) -> DealKind {
        self.kind
    }

    /// Returns the currency pair.
    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    /// Returns the signed notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the trade date.
    pub fn trade_date(&self) -> Date {
        self.trade_date
    }

    /// Returns the value (settlement) date.
    pub fn value_date(&self) -> Date {
        self.value_date
    }

    /// Returns the maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Fixed client rate; `None` marks a floating deal.
    pub fn fixed_rate(&self) -> Option<f64> {
        self.fixed_rate
    }

    /// Floating index name for floating deals (e.g. "SOFR_3M").
    pub fn floating_index(&self) -> Option<&str> {
        self.floating_index.as_deref()
    }

    /// OIS-equivalent rate locked at inception (trade-date valuation anchor).
    pub fn contract_rate(&self) -> f64 {
        self.contract_rate
    }

    /// FX rate dealt at inception; present exactly for FX kinds.
    pub fn traded_spot(&self) -> Option<f64> {
        self.traded_spot
    }

    /// Accrual day count convention.
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Trader identifier, when booked.
    pub fn trader(&self) -> Option<&str> {
        self.trader.as_deref()
    }

    /// True when no fixed client rate is attached.
    pub fn is_floating(&self) -> bool {
        self.fixed_rate.is_none()
    }
}

/// Builder for [`Deal`] with validate-on-construct semantics.
///
/// Missing required fields, malformed currencies, out-of-order dates, and
/// out-of-range rates are all rejected by [`DealBuilder::build`]; partial
/// instances never escape.
#[derive(Clone, Debug, Default)]
pub struct DealBuilder {
    id: Option<DealId>,
    label: Option<String>,
    kind: Option<DealKind>,
    pair: Option<String>,
    notional: Option<f64>,
    trade_date: Option<Date>,
    value_date: Option<Date>,
    maturity_date: Option<Date>,
    fixed_rate: Option<f64>,
    floating_index: Option<String>,
    contract_rate: Option<f64>,
    traded_spot: Option<f64>,
    day_count: Option<DayCount>,
    trader: Option<String>,
}

impl DealBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deal identifier. Generated when not supplied.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(DealId::new(id));
        self
    }

    /// Sets the free-text label (required, non-empty).
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the deal kind (required).
    pub fn kind(mut self, kind: DealKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the currency pair from its code, e.g. "EUR/USD" or "USD" (required).
    pub fn pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }

    /// Sets the signed notional (required, finite, non-zero).
    pub fn notional(mut self, notional: f64) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the trade date (required).
    pub fn trade_date(mut self, date: Date) -> Self {
        self.trade_date = Some(date);
        self
    }

    /// Sets the value date (required).
    pub fn value_date(mut self, date: Date) -> Self {
        self.value_date = Some(date);
        self
    }

    /// Sets the maturity date (required).
    pub fn maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Sets a fixed client rate; omit for floating deals.
    pub fn fixed_rate(mut self, rate: f64) -> Self {
        self.fixed_rate = Some(rate);
        self
    }

    /// Sets the floating index name for floating deals.
    pub fn floating_index(mut self, index: impl Into<String>) -> Self {
        self.floating_index = Some(index.into());
        self
    }

    /// Sets the OIS-equivalent rate at inception (required).
    pub fn contract_rate(mut self, rate: f64) -> Self {
        self.contract_rate = Some(rate);
        self
    }

    /// Sets the FX rate dealt at inception (required for FX kinds).
    pub fn traded_spot(mut self, spot: f64) -> Self {
        self.traded_spot = Some(spot);
        self
    }

    /// Sets the accrual convention. Defaults to ACT/365.
    pub fn day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Sets the trader identifier.
    pub fn trader(mut self, trader: impl Into<String>) -> Self {
        self.trader = Some(trader.into());
        self
    }

    /// Validates the candidate and constructs the deal.
    ///
    /// # Errors
    ///
    /// - `MissingField` for absent required fields (including `traded_spot`
    ///   on FX kinds),
    /// - `InvalidCurrency` for malformed pairs, or an FX kind on a
    ///   single-currency pair,
    /// - `InvalidNotional` for zero or non-finite notionals,
    /// - `InvalidDateOrder` unless trade <= value < maturity,
    /// - `InvalidRate` for non-finite rates or rates outside [-1, 1].
    pub fn build(self) -> Result<Deal, ValidationError> {
        let label = match self.label {
            Some(l) if !l.trim().is_empty() => l,
            _ => return Err(ValidationError::MissingField("label")),
        };
        let kind = self.kind.ok_or(ValidationError::MissingField("kind"))?;
        let pair: CurrencyPair = self
            .pair
            .ok_or(ValidationError::MissingField("pair"))?
            .parse()
            .map_err(ValidationError::InvalidCurrency)?;
        if kind.is_fx() && !pair.is_fx_pair() {
            return Err(ValidationError::InvalidCurrency(
                crate::types::CurrencyError::MalformedPair(format!(
                    "{} deal requires a two-currency pair, got {}",
                    kind,
                    pair.code()
                )),
            ));
        }

        let notional = self.notional.ok_or(ValidationError::MissingField("notional"))?;
        if !notional.is_finite() || notional == 0.0 {
            return Err(ValidationError::InvalidNotional(notional));
        }

        let trade_date = self.trade_date.ok_or(ValidationError::MissingField("trade_date"))?;
        let value_date = self.value_date.ok_or(ValidationError::MissingField("value_date"))?;
        let maturity_date = self
            .maturity_date
            .ok_or(ValidationError::MissingField("maturity_date"))?;
        if !(trade_date <= value_date && value_date < maturity_date && trade_date < maturity_date) {
            return Err(ValidationError::InvalidDateOrder {
                trade: trade_date.to_string(),
                value: value_date.to_string(),
                maturity: maturity_date.to_string(),
            });
        }

        let contract_rate = self
            .contract_rate
            .ok_or(ValidationError::MissingField("contract_rate"))?;
        check_rate("contract_rate", contract_rate)?;
        if let Some(rate) = self.fixed_rate {
            check_rate("fixed_rate", rate)?;
        }

        let traded_spot = match (kind.is_fx(), self.traded_spot) {
            (true, None) => return Err(ValidationError::MissingField("traded_spot")),
            (true, Some(spot)) if !spot.is_finite() || spot <= 0.0 => {
                return Err(ValidationError::InvalidRate {
                    field: "traded_spot",
                    value: spot,
                })
            }
            (true, spot) => spot,
            // Ignored rather than rejected: imports carry the column for
            // every row and blank it per product inconsistently.
            (false, _) => None,
        };

        Ok(Deal {
            id: self.id.unwrap_or_else(DealId::generate),
            label,
            kind,
            pair,
            notional,
            trade_date,
            value_date,
            maturity_date,
            fixed_rate: self.fixed_rate,
            floating_index: self.floating_index,
            contract_rate,
            traded_spot,
            day_count: self.day_count.unwrap_or(DayCount::Act365),
            trader: self.trader,
        })
    }
}

fn check_rate(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidRate { field, value });
    }
    Ok(())
}
