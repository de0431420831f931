//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValidationError`: deal or configuration rejected before entering an engine
//! - `DateError`: errors from date construction and parsing
//! - `CurrencyError`: errors from currency and pair parsing

use thiserror::Error;

/// Errors raised when a candidate deal or configuration fails validation.
///
/// A value that fails validation never exists as a constructed instance;
/// corrections are performed by building a replacement, not by mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was not supplied to the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Deal dates are not ordered trade <= value < maturity.
    #[error("invalid date order: trade={trade}, value={value}, maturity={maturity}")]
    InvalidDateOrder {
        /// Trade date as supplied.
        trade: String,
        /// Value date as supplied.
        value: String,
        /// Maturity date as supplied.
        maturity: String,
    },

    /// Currency pair is malformed or uses an unknown code.
    #[error("invalid currency: {0}")]
    InvalidCurrency(#[from] CurrencyError),

    /// Notional is zero or non-finite.
    #[error("invalid notional: {0}")]
    InvalidNotional(f64),

    /// A rate field is non-finite or outside its permitted range.
    #[error("invalid rate for {field}: {value}")]
    InvalidRate {
        /// Name of the offending field.
        field: &'static str,
        /// Value as supplied.
        value: f64,
    },

    /// Two deals in one set share an identifier.
    #[error("duplicate deal id: {0}")]
    DuplicateId(String),

    /// A date field failed to parse or construct.
    #[error("invalid date: {0}")]
    InvalidDate(#[from] DateError),
}

/// Errors from date construction and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// The year/month/day combination does not name a calendar date.
    #[error("invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component (1-12).
        month: u32,
        /// Day component.
        day: u32,
    },

    /// The input string is not an ISO 8601 date.
    #[error("cannot parse date: {0}")]
    Parse(String),
}

/// Errors from currency and currency-pair parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The code is not in the supported currency set.
    #[error("unknown currency code: {0}")]
    UnknownCode(String),

    /// Base and quote currency of a pair are identical.
    #[error("base and quote currency are identical: {0}")]
    SameCurrency(String),

    /// The pair string is not of the form "XXX/YYY" or "XXX".
    #[error("malformed currency pair: {0}")]
    MalformedPair(String),
}
