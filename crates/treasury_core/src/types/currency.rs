//! Currency codes and validated currency pairs.
//!
//! This module provides the ISO 4217 currency set the desk trades plus a
//! pair type that covers both FX pairs ("EUR/USD") and single-currency
//! money-market deals ("USD").
//!
//! # Examples
//!
//! ```
//! use treasury_core::types::{Currency, CurrencyPair};
//!
//! let pair: CurrencyPair = "EUR/USD".parse().unwrap();
//! assert_eq!(pair.base(), Currency::EUR);
//! assert_eq!(pair.quote(), Some(Currency::USD));
//! assert_eq!(pair.code(), "EUR/USD");
//!
//! // Money-market form: a single currency, no quote leg.
//! let single: CurrencyPair = "USD".parse().unwrap();
//! assert_eq!(single.quote(), None);
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::CurrencyError;

/// ISO 4217 currency codes supported by the analytics core.
///
/// The set matches the currencies quoted in the market snapshot feeds;
/// a deal in any other currency is rejected at validation time rather
/// than priced off a fallback curve.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Currency {
    /// United States Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
}

impl Currency {
    /// Returns the ISO 4217 three-letter code.
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
        }
    }

    /// All supported currencies, in code order.
    pub fn all() -> &'static [Currency] {
        &[
            Currency::AUD,
            Currency::CAD,
            Currency::CHF,
            Currency::EUR,
            Currency::GBP,
            Currency::JPY,
            Currency::USD,
        ]
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Parses a currency code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CHF" => Ok(Currency::CHF),
            "AUD" => Ok(Currency::AUD),
            "CAD" => Ok(Currency::CAD),
            other => Err(CurrencyError::UnknownCode(other.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validated currency pair, or a single currency for money-market deals.
///
/// The convention is BASE/QUOTE. FX deals require both legs; deposits and
/// loans are denominated in one currency and carry no quote leg. Equality
/// and hashing are structural, so two pairs with the same legs are the same
/// pair regardless of how they were constructed.
///
/// # Examples
///
/// ```
/// use treasury_core::types::{Currency, CurrencyPair};
///
/// let pair = CurrencyPair::new(Currency::USD, Some(Currency::JPY)).unwrap();
/// assert_eq!(pair.code(), "USD/JPY");
/// assert!(pair.is_fx_pair());
///
/// let mm = CurrencyPair::single(Currency::USD);
/// assert!(!mm.is_fx_pair());
/// assert_eq!(mm.code(), "USD");
/// ```
// Serialize only: deserialisation would bypass the same-currency check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct CurrencyPair {
    /// Base currency (the deal's denomination currency).
    base: Currency,
    /// Quote currency; `None` for single-currency deals.
    quote: Option<Currency>,
}

impl CurrencyPair {
    /// Creates a currency pair.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::SameCurrency` when base and quote are equal.
    pub fn new(base: Currency, quote: Option<Currency>) -> Result<Self, CurrencyError> {
        if quote == Some(base) {
            return Err(CurrencyError::SameCurrency(base.code().to_string()));
        }
        Ok(Self { base, quote })
    }

    /// Creates a single-currency (money-market) pair.
    #[inline]
    pub fn single(base: Currency) -> Self {
        Self { base, quote: None }
    }

    /// Returns the base currency.
    #[inline]
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Returns the quote currency, if the pair has one.
    #[inline]
    pub fn quote(&self) -> Option<Currency> {
        self.quote
    }

    /// True when the pair has two legs and can carry FX risk.
    #[inline]
    pub fn is_fx_pair(&self) -> bool {
        self.quote.is_some()
    }

    /// Returns the pair code: "EUR/USD" for pairs, "USD" for singles.
    pub fn code(&self) -> String {
        match self.quote {
            Some(quote) => format!("{}/{}", self.base.code(), quote.code()),
            None => self.base.code().to_string(),
        }
    }

    /// Returns the inverted pair code ("USD/EUR" for "EUR/USD"), if any.
    ///
    /// Used by snapshot lookups to fall back on a reciprocal quote.
    pub fn inverted_code(&self) -> Option<String> {
        self.quote
            .map(|quote| format!("{}/{}", quote.code(), self.base.code()))
    }

    /// True when either leg is the given currency.
    #[inline]
    pub fn contains(&self, currency: Currency) -> bool {
        self.base == currency || self.quote == Some(currency)
    }
}

impl FromStr for CurrencyPair {
    type Err = CurrencyError;

    /// Parses "EUR/USD" or a bare "USD".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((base, quote)) => {
                if base.is_empty() || quote.is_empty() {
                    return Err(CurrencyError::MalformedPair(s.to_string()));
                }
                CurrencyPair::new(base.parse()?, Some(quote.parse()?))
            }
            None => {
                if s.is_empty() {
                    return Err(CurrencyError::MalformedPair(s.to_string()));
                }
                Ok(CurrencyPair::single(s.parse()?))
            }
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
