//! Time types and day count conventions for accrual calculations.
//!
//! This module provides:
//! - `Date`: type-safe date wrapper around chrono::NaiveDate
//! - `DayCount`: industry-standard day count conventions
//!
//! # Examples
//!
//! ```
//! use treasury_core::types::{Date, DayCount};
//!
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 7, 1).unwrap();
//!
//! let yf = DayCount::Act365.year_fraction(start, end);
//! assert!((yf - 0.4959).abs() < 0.001);
//! ```

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 parsing/serialisation and the date arithmetic the
/// engines need. Dates are always timezone-naive calendar dates; the
/// valuation timestamp semantics of the original intraday feeds are out of
/// scope for this core.
///
/// # Examples
///
/// ```
/// use treasury_core::types::Date;
///
/// let date = Date::from_ymd(2025, 6, 15).unwrap();
/// assert_eq!(date.year(), 2025);
///
/// let parsed: Date = "2025-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` when the components do not name a
    /// calendar date (e.g. February 30th).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns the year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Signed number of days from `self` to `other`.
    ///
    /// Positive when `other` is after `self`.
    #[inline]
    pub fn days_until(&self, other: Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying chrono date.
    #[inline]
    pub fn inner(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of days between two dates (`self - other`).
    fn sub(self, other: Date) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::from_str(s)
            .map(Date)
            .map_err(|_| DateError::Parse(s.to_string()))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Industry-standard day count conventions.
///
/// Determines how a calendar period converts to a year fraction for
/// accrual calculations. Each deal carries its own convention.
///
/// # Examples
///
/// ```
/// use treasury_core::types::{Date, DayCount};
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2026, 1, 1).unwrap();
///
/// assert!((DayCount::Act365.year_fraction(start, end) - 1.0).abs() < 1e-10);
/// assert!((DayCount::Act360.year_fraction(start, end) - 365.0 / 360.0).abs() < 1e-10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DayCount {
    /// Actual/365 Fixed: actual days divided by 365.
    Act365,
    /// Actual/360: actual days divided by 360.
    Act360,
    /// 30/360 US: 30-day months, 360-day year.
    Thirty360,
}

impl DayCount {
    /// Returns the market name of the convention.
    pub fn name(&self) -> &'static str {
        match self {
            DayCount::Act365 => "ACT/365",
            DayCount::Act360 => "ACT/360",
            DayCount::Thirty360 => "30/360",
        }
    }

    /// Year fraction between two dates under this convention.
    ///
    /// Returns 0.0 when `end <= start`; accrual periods never run backwards.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if end <= start {
            return 0.0;
        }
        match self {
            DayCount::Act365 => (end - start) as f64 / 365.0,
            DayCount::Act360 => (end - start) as f64 / 360.0,
            DayCount::Thirty360 => {
                let d1 = start.day().min(30);
                let d2 = if d1 == 30 { end.day().min(30) } else { end.day() };
                let days = 360 * (end.year() - start.year()) as i64
                    + 30 * (end.month() as i64 - start.month() as i64)
                    + (d2 as i64 - d1 as i64);
                days as f64 / 360.0
            }
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
