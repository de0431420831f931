//! Calculation configuration: a closed, validated record.
//!
//! The configuration is part of the cache key: two configurations that
//! differ in any field never share a cache entry. The valuation date is an
//! explicit field rather than ambient process state, so the same deal set
//! can be valued as-of any date and each valuation fingerprints
//! differently.

use crate::types::{Date, ValidationError};

/// Configuration for a PnL computation.
///
/// Component flags select which PnL columns are computed; disabled
/// components still appear in the result with value zero so the table
/// shape is reproducible. The optional OIS override replaces the snapshot
/// rate for every deal when set.
///
/// # Examples
///
/// ```
/// use treasury_core::config::CalcConfig;
/// use treasury_core::types::Date;
///
/// let config = CalcConfig::new(Date::from_ymd(2025, 8, 7).unwrap());
/// assert!(config.calc_accrued());
/// assert_eq!(config.ois_rate_override(), None);
///
/// let config = config.with_ois_override(0.03).unwrap();
/// assert_eq!(config.ois_rate_override(), Some(0.03));
///
/// // Out-of-range overrides are rejected, not clamped.
/// assert!(config.with_ois_override(1.5).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CalcConfig {
    calc_accrued: bool,
    calc_mtm: bool,
    calc_rate: bool,
    calc_liquidity: bool,
    ois_rate_override: Option<f64>,
    valuation_date: Date,
}

impl CalcConfig {
    /// Creates a configuration with every component enabled and no
    /// override, valued as of the given date.
    pub fn new(valuation_date: Date) -> Self {
        Self {
            calc_accrued: true,
            calc_mtm: true,
            calc_rate: true,
            calc_liquidity: true,
            ois_rate_override: None,
            valuation_date,
        }
    }

    /// Enables or disables the accrued component.
    pub fn with_accrued(mut self, enabled: bool) -> Self {
        self.calc_accrued = enabled;
        self
    }

    /// Enables or disables the mark-to-market component.
    pub fn with_mtm(mut self, enabled: bool) -> Self {
        self.calc_mtm = enabled;
        self
    }

    /// Enables or disables the rate component.
    pub fn with_rate(mut self, enabled: bool) -> Self {
        self.calc_rate = enabled;
        self
    }

    /// Enables or disables the liquidity component.
    pub fn with_liquidity(mut self, enabled: bool) -> Self {
        self.calc_liquidity = enabled;
        self
    }

    /// Sets the OIS rate override, validated to [0, 1].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRate` for non-finite values or
    /// values outside [0, 1].
    pub fn with_ois_override(mut self, rate: f64) -> Result<Self, ValidationError> {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(ValidationError::InvalidRate {
                field: "ois_rate_override",
                value: rate,
            });
        }
        self.ois_rate_override = Some(rate);
        Ok(self)
    }

    /// Clears the OIS rate override.
    pub fn without_ois_override(mut self) -> Self {
        self.ois_rate_override = None;
        self
    }

    /// Whether the accrued component is computed.
    pub fn calc_accrued(&self) -> bool {
        self.calc_accrued
    }

    /// Whether the mark-to-market component is computed.
    pub fn calc_mtm(&self) -> bool {
        self.calc_mtm
    }

    /// Whether the rate component is computed.
    pub fn calc_rate(&self) -> bool {
        self.calc_rate
    }

    /// Whether the liquidity component is computed.
    pub fn calc_liquidity(&self) -> bool {
        self.calc_liquidity
    }

    /// The OIS rate override, when set.
    pub fn ois_rate_override(&self) -> Option<f64> {
        self.ois_rate_override
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }
}
